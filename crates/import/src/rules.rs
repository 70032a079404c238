use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tally_core::{Transaction, OTHER_CATEGORY};
use thiserror::Error;
use tracing::debug;

/// Built-in categories, scanned top to bottom.
pub const DEFAULT_CATEGORY_RULES: &[(&str, &[&str])] = &[
    ("Salary", &["payroll", "salary", "paycheque", "direct deposit"]),
    ("Rent", &["rent", "landlord"]),
    (
        "Groceries",
        &["grocery", "supermarket", "metro", "loblaws", "sobeys", "no frills", "food basics"],
    ),
    (
        "Restaurants",
        &["restaurant", "cafe", "coffee", "starbucks", "tim hortons", "ubereats"],
    ),
    (
        "Transport",
        &["uber", "lyft", "subway", "metro pass", "ttc", "go transit", "gas", "petro", "esso"],
    ),
    (
        "Utilities",
        &["hydro", "electric", "water", "internet", "rogers", "bell", "telus"],
    ),
    (
        "Entertainment",
        &["netflix", "spotify", "movie", "cinema", "game", "concert"],
    ),
    ("Fees", &["fee", "service charge", "atm fee", "bank charge"]),
    ("Transfer", &["etransfer", "e-transfer", "interac", "transfer"]),
    ("Other", &[]),
];

#[derive(Error, Debug)]
pub enum RulesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse rules TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Duplicate category: {0}")]
    DuplicateCategory(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        CategoryRule {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Internal pairing of a rule with its lowercased keywords.
#[derive(Debug, Clone)]
struct CompiledRule {
    rule: CategoryRule,
    needles: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RulesFile {
    #[serde(default)]
    category: Vec<CategoryRule>,
}

/// Ordered keyword rules. The first category with a keyword contained in
/// the description wins; within a category keywords are tried in order.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<CompiledRule>,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::compile(
            DEFAULT_CATEGORY_RULES
                .iter()
                .map(|(name, keywords)| CategoryRule::new(name, keywords))
                .collect(),
        )
    }
}

impl RuleTable {
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self, RulesError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.name.as_str()) {
                return Err(RulesError::DuplicateCategory(rule.name.clone()));
            }
        }
        Ok(Self::compile(rules))
    }

    fn compile(rules: Vec<CategoryRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| {
                let needles = rule.keywords.iter().map(|k| k.to_lowercase()).collect();
                CompiledRule { rule, needles }
            })
            .collect();
        Self { rules }
    }

    /// Parses `[[category]]` tables; file order is match order.
    pub fn from_toml(toml_content: &str) -> Result<Self, RulesError> {
        let file: RulesFile = toml::from_str(toml_content)?;
        Self::new(file.category)
    }

    pub fn load(path: &Path) -> Result<Self, RulesError> {
        let content = std::fs::read_to_string(path)?;
        let table = Self::from_toml(&content)?;
        debug!(path = %path.display(), categories = table.rules.len(), "loaded category rules");
        Ok(table)
    }

    pub fn rules(&self) -> impl Iterator<Item = &CategoryRule> {
        self.rules.iter().map(|cr| &cr.rule)
    }

    pub fn categorize_description(&self, description: &str) -> &str {
        let text = description.to_lowercase();
        self.rules
            .iter()
            .find(|cr| cr.needles.iter().any(|needle| text.contains(needle.as_str())))
            .map_or(OTHER_CATEGORY, |cr| cr.rule.name.as_str())
    }
}

/// Assigns a category to every transaction in place.
pub fn categorize(transactions: &mut [Transaction], rules: &RuleTable) {
    for tx in transactions.iter_mut() {
        tx.category = Some(rules.categorize_description(&tx.description).to_string());
    }
}
