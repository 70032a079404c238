use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Category assigned when no rule matches.
pub const OTHER_CATEGORY: &str = "Other";

/// Direction of a transaction. Explicit labels from the source other than
/// INCOME/EXPENSE are kept verbatim (uppercased) in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TxType {
    Income,
    Expense,
    Other(String),
}

impl TxType {
    /// Decides the type from an optional raw label, falling back to the
    /// sign of `amount` when the label is absent or blank. Zero is income.
    pub fn normalize(amount: Money, raw: Option<&str>) -> TxType {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(label) => TxType::from(label.to_uppercase()),
            None if amount.is_negative() => TxType::Expense,
            None => TxType::Income,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TxType::Income => "INCOME",
            TxType::Expense => "EXPENSE",
            TxType::Other(s) => s,
        }
    }

    /// Only income keeps the reported sign; every other type is an outflow.
    pub fn signed(&self, amount: Money) -> Money {
        match self {
            TxType::Income => amount,
            _ => -amount.abs(),
        }
    }
}

impl From<String> for TxType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "INCOME" => TxType::Income,
            "EXPENSE" => TxType::Expense,
            _ => TxType::Other(s),
        }
    }
}

impl From<TxType> for String {
    fn from(t: TxType) -> Self {
        match t {
            TxType::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cleaned transaction row. `amount` is the value as reported by the
/// source; `signed_amount` is derived from it and `tx_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub signed_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Transaction {
    pub fn new(date: NaiveDate, description: String, amount: Money, raw_type: Option<&str>) -> Self {
        let tx_type = TxType::normalize(amount, raw_type);
        let signed_amount = tx_type.signed(amount);
        Transaction {
            date,
            description,
            amount,
            tx_type,
            signed_amount,
            category: None,
        }
    }

    /// The assigned category, or `Other` before categorization.
    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or(OTHER_CATEGORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(cents: i64, raw_type: Option<&str>) -> Transaction {
        Transaction::new(date(2024, 1, 15), "Test".to_string(), Money::from_cents(cents), raw_type)
    }

    #[test]
    fn explicit_label_wins_over_sign() {
        assert_eq!(TxType::normalize(Money::from_cents(-500), Some("income")), TxType::Income);
        assert_eq!(TxType::normalize(Money::from_cents(500), Some(" expense ")), TxType::Expense);
    }

    #[test]
    fn unknown_label_is_uppercased_verbatim() {
        assert_eq!(
            TxType::normalize(Money::from_cents(100), Some("Transfer")),
            TxType::Other("TRANSFER".to_string())
        );
    }

    #[test]
    fn blank_label_infers_from_sign() {
        assert_eq!(TxType::normalize(Money::from_cents(-1), Some("")), TxType::Expense);
        assert_eq!(TxType::normalize(Money::from_cents(-1), Some("   ")), TxType::Expense);
        assert_eq!(TxType::normalize(Money::from_cents(1), None), TxType::Income);
    }

    #[test]
    fn zero_amount_is_income() {
        assert_eq!(TxType::normalize(Money::zero(), None), TxType::Income);
    }

    #[test]
    fn income_keeps_reported_sign() {
        let t = tx(-2000, Some("INCOME"));
        assert_eq!(t.signed_amount, Money::from_cents(-2000));
        let t = tx(300_000, None);
        assert_eq!(t.signed_amount, Money::from_cents(300_000));
    }

    #[test]
    fn non_income_is_always_outflow() {
        assert_eq!(tx(2000, Some("expense")).signed_amount, Money::from_cents(-2000));
        assert_eq!(tx(-2000, None).signed_amount, Money::from_cents(-2000));
        let transfer = tx(2000, Some("transfer"));
        assert_eq!(transfer.tx_type.as_str(), "TRANSFER");
        assert_eq!(transfer.signed_amount, Money::from_cents(-2000));
    }

    #[test]
    fn category_defaults_to_other() {
        let mut t = tx(100, None);
        assert_eq!(t.category(), OTHER_CATEGORY);
        t.category = Some("Rent".to_string());
        assert_eq!(t.category(), "Rent");
    }

    #[test]
    fn serializes_type_as_plain_string() {
        let mut t = tx(-2550, None);
        t.category = Some("Transport".to_string());
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["type"], "EXPENSE");
        assert_eq!(json["date"], "2024-01-15");
        assert_eq!(json["signed_amount"], -25.5);
        assert_eq!(json["category"], "Transport");

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, t);
    }
}
