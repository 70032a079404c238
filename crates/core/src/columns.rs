use serde::{Deserialize, Serialize};

/// Source column names for the canonical fields of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub date: String,
    pub description: String,
    pub amount: String,
    /// `None` (or an empty name) means the input has no type column.
    #[serde(rename = "type")]
    pub tx_type: Option<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date: "date".to_string(),
            description: "description".to_string(),
            amount: "amount".to_string(),
            tx_type: Some("type".to_string()),
        }
    }
}

impl ColumnMapping {
    pub fn new(date: &str, description: &str, amount: &str, tx_type: Option<&str>) -> Self {
        Self {
            date: date.to_string(),
            description: description.to_string(),
            amount: amount.to_string(),
            tx_type: tx_type.map(str::to_string),
        }
    }

    pub fn tx_type(&self) -> Option<&str> {
        self.tx_type.as_deref().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_canonical_names() {
        let m = ColumnMapping::default();
        assert_eq!(m.date, "date");
        assert_eq!(m.description, "description");
        assert_eq!(m.amount, "amount");
        assert_eq!(m.tx_type(), Some("type"));
    }

    #[test]
    fn empty_type_column_means_none() {
        let m = ColumnMapping::new("Date", "Memo", "Value", Some(""));
        assert_eq!(m.tx_type(), None);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let m: ColumnMapping = serde_json::from_str(r#"{"date": "Posted", "type": null}"#).unwrap();
        assert_eq!(m.date, "Posted");
        assert_eq!(m.amount, "amount");
        assert_eq!(m.tx_type(), None);
    }
}
