//! Aggregated views over cleaned, categorized transactions, and the
//! pipeline that produces them from raw rows.

pub mod aggregate;
pub mod config;
pub mod report;

pub use aggregate::{
    category_breakdown, flag_large, monthly_net, summarize, CategoryTotal, MonthlyNet, Summary,
};
pub use config::{ConfigError, ReportConfig};
pub use report::{
    build_report, default_threshold, report_from_file, report_from_json, Report, ReportError,
    ReportOptions,
};
