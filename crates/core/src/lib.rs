pub mod columns;
pub mod money;
pub mod period;
pub mod transaction;

pub use columns::ColumnMapping;
pub use money::Money;
pub use period::{DateRange, Month, PeriodError};
pub use transaction::{Transaction, TxType, OTHER_CATEGORY};
