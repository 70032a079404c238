use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// A single untrusted cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl RawValue {
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Textual form of a present value; `None` for null.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            RawValue::Null => None,
            RawValue::Bool(b) => Some(Cow::Owned(b.to_string())),
            RawValue::Number(n) => Some(Cow::Owned(n.to_string())),
            RawValue::Text(s) => Some(Cow::Borrowed(s)),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Number(n.into())
    }
}

impl From<f64> for RawValue {
    /// Non-finite floats have no JSON form and become null.
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n).map_or(RawValue::Null, RawValue::Number)
    }
}

pub type RawRow = BTreeMap<String, RawValue>;

/// Rows of arbitrary columns, as read from a CSV file or a JSON body.
/// A row lacking a key holds null for that column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a table whose columns are the union of every row's keys,
    /// in first-seen order.
    pub fn from_rows(rows: Vec<RawRow>) -> Self {
        let mut table = RawTable::default();
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Parses a JSON array of flat objects.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let rows: Vec<RawRow> = serde_json::from_str(json)?;
        Ok(Self::from_rows(rows))
    }

    pub fn push_row(&mut self, row: RawRow) {
        for key in row.keys() {
            if !self.has_column(key) {
                self.columns.push(key.clone());
            }
        }
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
