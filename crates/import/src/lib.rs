pub mod clean;
pub mod csv;
pub mod raw;
pub mod rules;
pub(crate) mod util;

pub use clean::{clean, clean_with_diagnostics, CleanError, CleanOutcome, DropReason, DroppedRow};
pub use crate::csv::{read_csv, read_input, ReadError};
pub use raw::{RawRow, RawTable, RawValue};
pub use rules::{categorize, CategoryRule, RuleTable, RulesError, DEFAULT_CATEGORY_RULES};
