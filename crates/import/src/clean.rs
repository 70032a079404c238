use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_core::{ColumnMapping, Money, Transaction};
use thiserror::Error;
use tracing::{debug, info};

use crate::raw::{RawRow, RawTable, RawValue};
use crate::util::{amount_value, date_value};

const DATE: &str = "date";
const DESCRIPTION: &str = "description";
const AMOUNT: &str = "amount";
const TYPE: &str = "type";

static NULL: RawValue = RawValue::Null;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CleanError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    MissingDate,
    InvalidDate,
    MissingAmount,
    InvalidAmount,
    MissingDescription,
}

/// An input row excluded from the canonical table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedRow {
    /// Zero-based position in the raw input.
    pub index: usize,
    pub reasons: Vec<DropReason>,
}

#[derive(Debug, Clone, Default)]
pub struct CleanOutcome {
    pub transactions: Vec<Transaction>,
    pub dropped: Vec<DroppedRow>,
}

/// Source column actually read for each canonical field.
struct Resolved<'a> {
    date: &'a str,
    description: &'a str,
    amount: &'a str,
    tx_type: Option<&'a str>,
}

impl<'a> Resolved<'a> {
    fn new(raw: &'a RawTable, mapping: &'a ColumnMapping) -> Result<Self, CleanError> {
        let tx_type = mapping.tx_type().and_then(|source| {
            if raw.has_column(source) {
                Some(source)
            } else {
                raw.has_column(TYPE).then_some(TYPE)
            }
        });
        Ok(Resolved {
            date: required(raw, &mapping.date, DATE)?,
            description: required(raw, &mapping.description, DESCRIPTION)?,
            amount: required(raw, &mapping.amount, AMOUNT)?,
            tx_type,
        })
    }
}

/// The mapped source column when present, else a column already carrying
/// the canonical name.
fn required<'a>(raw: &RawTable, source: &'a str, canonical: &'static str) -> Result<&'a str, CleanError> {
    if raw.has_column(source) {
        Ok(source)
    } else if raw.has_column(canonical) {
        Ok(canonical)
    } else {
        Err(CleanError::MissingColumn(source.to_string()))
    }
}

fn cell<'r>(row: &'r RawRow, column: &str) -> &'r RawValue {
    row.get(column).unwrap_or(&NULL)
}

fn clean_row(row: &RawRow, cols: &Resolved<'_>) -> Result<Transaction, Vec<DropReason>> {
    let mut reasons = Vec::new();

    let date_cell = cell(row, cols.date);
    let date: Option<NaiveDate> = if date_cell.is_null() {
        reasons.push(DropReason::MissingDate);
        None
    } else {
        let parsed = date_value(date_cell);
        if parsed.is_none() {
            reasons.push(DropReason::InvalidDate);
        }
        parsed
    };

    let amount_cell = cell(row, cols.amount);
    let amount = if amount_cell.is_null() {
        reasons.push(DropReason::MissingAmount);
        None
    } else {
        let parsed = amount_value(amount_cell).map(Money::new);
        if parsed.is_none() {
            reasons.push(DropReason::InvalidAmount);
        }
        parsed
    };

    // Presence only: an empty description is still a description.
    let description = cell(row, cols.description).as_text();
    if description.is_none() {
        reasons.push(DropReason::MissingDescription);
    }

    match (date, amount, description) {
        (Some(date), Some(amount), Some(description)) => {
            let raw_type = cols.tx_type.and_then(|c| cell(row, c).as_text());
            Ok(Transaction::new(
                date,
                description.into_owned(),
                amount,
                raw_type.as_deref(),
            ))
        }
        _ => Err(reasons),
    }
}

/// Cleans `raw` into canonical transactions, recording every dropped row.
///
/// Only a required column missing from the whole input is an error; rows
/// with an absent or unparsable date, amount or description are excluded.
pub fn clean_with_diagnostics(
    raw: &RawTable,
    mapping: &ColumnMapping,
) -> Result<CleanOutcome, CleanError> {
    let cols = Resolved::new(raw, mapping)?;
    let mut outcome = CleanOutcome::default();

    for (index, row) in raw.rows().iter().enumerate() {
        match clean_row(row, &cols) {
            Ok(tx) => outcome.transactions.push(tx),
            Err(reasons) => {
                debug!(row = index, ?reasons, "dropping transaction row");
                outcome.dropped.push(DroppedRow { index, reasons });
            }
        }
    }

    info!(
        input = raw.len(),
        kept = outcome.transactions.len(),
        dropped = outcome.dropped.len(),
        "cleaned transactions"
    );
    Ok(outcome)
}

pub fn clean(raw: &RawTable, mapping: &ColumnMapping) -> Result<Vec<Transaction>, CleanError> {
    clean_with_diagnostics(raw, mapping).map(|outcome| outcome.transactions)
}
