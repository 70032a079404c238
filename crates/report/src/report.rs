use serde::{Deserialize, Serialize};
use std::path::Path;
use tally_core::{ColumnMapping, DateRange, Money, Transaction};
use tally_import::{
    categorize, clean_with_diagnostics, read_input, CleanError, DroppedRow, RawTable, ReadError,
    RuleTable, RulesError,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::aggregate::{
    category_breakdown, flag_large, monthly_net, summarize, CategoryTotal, MonthlyNet, Summary,
};
use crate::config::ReportConfig;

/// Flagging threshold used when none is configured: 10,000.
pub fn default_threshold() -> Money {
    Money::from_cents(1_000_000)
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to read input: {0}")]
    Read(#[from] ReadError),
    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to load rules: {0}")]
    Rules(#[from] RulesError),
    #[error(transparent)]
    Clean(#[from] CleanError),
}

/// Per-invocation settings of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub columns: ColumnMapping,
    pub threshold: Money,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            threshold: default_threshold(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub summary: Summary,
    pub category_breakdown: Vec<CategoryTotal>,
    pub flags: Vec<Transaction>,
    pub monthly_net: Vec<MonthlyNet>,
    pub period: Option<DateRange>,
    pub transactions: Vec<Transaction>,
    pub dropped: Vec<DroppedRow>,
    /// Rows supplied before cleaning; compare with `summary.count`.
    pub input_count: usize,
}

/// Runs clean → categorize → aggregate over one raw table.
pub fn build_report(
    raw: &RawTable,
    options: &ReportOptions,
    rules: &RuleTable,
) -> Result<Report, ReportError> {
    let outcome = clean_with_diagnostics(raw, &options.columns)?;
    let mut transactions = outcome.transactions;
    categorize(&mut transactions, rules);

    let summary = summarize(&transactions);
    let report = Report {
        summary,
        category_breakdown: category_breakdown(&transactions),
        flags: flag_large(&transactions, options.threshold),
        monthly_net: monthly_net(&transactions),
        period: DateRange::spanning(transactions.iter().map(|t| t.date)),
        transactions,
        dropped: outcome.dropped,
        input_count: raw.len(),
    };

    info!(
        count = report.summary.count,
        flagged = report.flags.len(),
        net = %report.summary.net,
        "built report"
    );
    if let Some(period) = &report.period {
        debug!(%period, "report period");
    }
    Ok(report)
}

/// Builds a report from a JSON array of records.
pub fn report_from_json(
    json: &str,
    options: &ReportOptions,
    rules: &RuleTable,
) -> Result<Report, ReportError> {
    let raw = RawTable::from_json(json)?;
    build_report(&raw, options, rules)
}

/// Reads `path` and builds a report with the settings in `config`.
pub fn report_from_file(path: &Path, config: &ReportConfig) -> Result<Report, ReportError> {
    let raw = read_input(path, &config.delimiter)?;
    let rules = config.rule_table()?;
    build_report(&raw, &config.options(), &rules)
}
