use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tally_core::{Money, Month, Transaction};
use tracing::warn;

/// Headline totals, each rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_income: Money,
    pub total_expense: Money,
    /// Always exactly `total_income - total_expense`.
    pub net: Money,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyNet {
    pub month: Month,
    pub net: Money,
}

/// Adds `amount` to a running total, saturating at the decimal bounds.
fn accumulate(total: Money, amount: Money) -> Money {
    total.checked_add(amount).unwrap_or_else(|| {
        warn!(%total, %amount, "running total overflowed, saturating");
        total + amount
    })
}

pub fn summarize(transactions: &[Transaction]) -> Summary {
    let total_income = transactions
        .iter()
        .map(|t| t.signed_amount)
        .filter(|m| m.is_positive())
        .fold(Money::zero(), accumulate)
        .round_cents();
    let total_expense = -transactions
        .iter()
        .map(|t| t.signed_amount)
        .filter(|m| m.is_negative())
        .fold(Money::zero(), accumulate);
    let total_expense = total_expense.round_cents();

    Summary {
        total_income,
        total_expense,
        net: total_income - total_expense,
        count: transactions.len(),
    }
}

/// Absolute net per category, largest first. Categories with equal totals
/// keep the order in which they first appear.
///
/// Income and expenses inside one category offset each other, so the
/// totals only add up to `total_income + total_expense` when no category
/// mixes signs.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut sums: Vec<(&str, Money)> = Vec::new();
    for tx in transactions {
        let category = tx.category();
        match sums.iter_mut().find(|(name, _)| *name == category) {
            Some((_, sum)) => *sum = accumulate(*sum, tx.signed_amount),
            None => sums.push((category, tx.signed_amount)),
        }
    }

    let mut rows: Vec<CategoryTotal> = sums
        .into_iter()
        .map(|(category, sum)| CategoryTotal {
            category: category.to_string(),
            total: sum.abs().round_cents(),
        })
        .collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total));
    rows
}

/// Transactions whose reported magnitude reaches `threshold`, ordered by
/// the reported signed amount, highest first.
pub fn flag_large(transactions: &[Transaction], threshold: Money) -> Vec<Transaction> {
    let mut flags: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.amount.abs() >= threshold)
        .cloned()
        .collect();
    flags.sort_by(|a, b| b.amount.cmp(&a.amount));
    flags
}

/// Net signed amount per calendar month, oldest first.
pub fn monthly_net(transactions: &[Transaction]) -> Vec<MonthlyNet> {
    let mut by_month: BTreeMap<Month, Money> = BTreeMap::new();
    for tx in transactions {
        let net = by_month.entry(Month::of(tx.date)).or_default();
        *net = accumulate(*net, tx.signed_amount);
    }
    by_month
        .into_iter()
        .map(|(month, net)| MonthlyNet {
            month,
            net: net.round_cents(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(day: u32, desc: &str, cents: i64, raw_type: Option<&str>, category: &str) -> Transaction {
        let mut t = Transaction::new(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            desc.to_string(),
            Money::from_cents(cents),
            raw_type,
        );
        t.category = Some(category.to_string());
        t
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx(5, "Payroll Jan", 300_000, Some(""), "Salary"),
            tx(10, "Uber ride", -2550, None, "Transport"),
            tx(15, "Rent payment", -150_000, None, "Rent"),
        ]
    }

    #[test]
    fn summarize_sample() {
        let s = summarize(&sample());
        assert_eq!(s.total_income, Money::from_cents(300_000));
        assert_eq!(s.total_expense, Money::from_cents(152_550));
        assert_eq!(s.net, Money::from_cents(147_450));
        assert_eq!(s.count, 3);
    }

    #[test]
    fn summarize_empty() {
        let s = summarize(&[]);
        assert!(s.total_income.is_zero());
        assert!(s.total_expense.is_zero());
        assert!(s.net.is_zero());
        assert_eq!(s.count, 0);
    }

    #[test]
    fn other_types_count_as_expense() {
        let txs = vec![
            tx(1, "Move", 5000, Some("transfer"), "Transfer"),
            tx(2, "Refund", -1000, Some("income"), "Other"),
        ];
        let s = summarize(&txs);
        assert!(s.total_income.is_zero());
        assert_eq!(s.total_expense, Money::from_cents(6000));
        assert_eq!(s.net, Money::from_cents(-6000));
    }

    #[test]
    fn net_is_exact_difference_of_rounded_totals() {
        let txs = vec![
            tx(1, "a", 0, None, "Other"),
            Transaction::new(
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                "b".to_string(),
                Money::new(rust_decimal::Decimal::new(10_005, 3)),
                None,
            ),
            Transaction::new(
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                "c".to_string(),
                Money::new(rust_decimal::Decimal::new(-3_335, 3)),
                None,
            ),
        ];
        let s = summarize(&txs);
        assert_eq!(s.net, s.total_income - s.total_expense);
        assert_eq!(s.total_income, Money::from_cents(1000));
        assert_eq!(s.total_expense, Money::from_cents(334));
    }

    #[test]
    fn totals_near_decimal_limit_saturate() {
        let huge = |day: u32, amount: Money| {
            let mut t = Transaction::new(
                NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                "huge".to_string(),
                amount,
                None,
            );
            t.category = Some("Other".to_string());
            t
        };
        let max = Money::new(rust_decimal::Decimal::MAX);
        let txs = vec![huge(1, max), huge(2, max), huge(3, -max), huge(4, -max)];

        let s = summarize(&txs);
        assert_eq!(s.total_income, max.round_cents());
        assert_eq!(s.total_expense, max.round_cents());
        assert!(s.net.is_zero());

        assert_eq!(category_breakdown(&txs[..2])[0].total, max.round_cents());
        assert_eq!(monthly_net(&txs[..2])[0].net, max.round_cents());
    }

    #[test]
    fn breakdown_sorted_by_total() {
        let rows = category_breakdown(&sample());
        let names: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(names, ["Salary", "Rent", "Transport"]);
        assert_eq!(rows[2].total, Money::from_cents(2550));
    }

    #[test]
    fn breakdown_groups_and_takes_absolute_value() {
        let txs = vec![
            tx(1, "Coffee", -450, None, "Restaurants"),
            tx(2, "Cafe", -550, None, "Restaurants"),
            tx(3, "Refund", 200, None, "Restaurants"),
        ];
        let rows = category_breakdown(&txs);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total, Money::from_cents(800));
    }

    #[test]
    fn breakdown_ties_keep_first_seen_order() {
        let txs = vec![
            tx(1, "b", -100, None, "B"),
            tx(2, "a", -100, None, "A"),
            tx(3, "c", -100, None, "C"),
        ];
        let names: Vec<String> = category_breakdown(&txs).into_iter().map(|r| r.category).collect();
        assert_eq!(names, ["B", "A", "C"]);
    }

    #[test]
    fn breakdown_uncategorized_rows_are_other() {
        let t = Transaction::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            "x".to_string(),
            Money::from_cents(-100),
            None,
        );
        let rows = category_breakdown(&[t]);
        assert_eq!(rows[0].category, "Other");
    }

    #[test]
    fn flag_large_inclusive_and_ordered_by_raw_amount() {
        let flags = flag_large(&sample(), Money::from_cents(150_000));
        let amounts: Vec<Money> = flags.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, [Money::from_cents(300_000), Money::from_cents(-150_000)]);
    }

    #[test]
    fn flag_large_zero_threshold_flags_everything() {
        let txs = vec![
            tx(1, "big expense", -900_000, None, "Other"),
            tx(2, "small income", 50_000, None, "Other"),
        ];
        let flags = flag_large(&txs, Money::zero());
        assert_eq!(flags.len(), 2);
        assert_eq!(flags[0].description, "small income");
        assert_eq!(flags[1].description, "big expense");

        assert_eq!(flag_large(&txs, Money::from_cents(-1)).len(), 2);
    }

    #[test]
    fn flag_large_does_not_touch_input() {
        let txs = sample();
        let before = txs.clone();
        let _ = flag_large(&txs, Money::zero());
        assert_eq!(txs, before);
    }

    #[test]
    fn monthly_net_buckets_by_month() {
        let mut txs = sample();
        let mut feb = Transaction::new(
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            "Coffee".to_string(),
            Money::from_cents(-500),
            None,
        );
        feb.category = Some("Restaurants".to_string());
        txs.insert(0, feb);

        let months = monthly_net(&txs);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month.to_string(), "2024-01");
        assert_eq!(months[0].net, Money::from_cents(147_450));
        assert_eq!(months[1].month.to_string(), "2024-02");
        assert_eq!(months[1].net, Money::from_cents(-500));
    }
}
