use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tally_core::{ColumnMapping, Money};
use tally_import::{RuleTable, RulesError};
use thiserror::Error;

use crate::report::{default_threshold, ReportOptions};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// File-level settings, every field optional:
///
/// ```toml
/// threshold = 5000.0
/// delimiter = ";"
/// rules = "rules.toml"
///
/// [columns]
/// date = "Posted"
/// description = "Memo"
/// amount = "Value"
/// type = ""
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub columns: ColumnMapping,
    pub threshold: Money,
    pub delimiter: String,
    /// Custom rule table; the built-in table when absent.
    pub rules: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            threshold: default_threshold(),
            delimiter: ",".to_string(),
            rules: None,
        }
    }
}

impl ReportConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_content)?)
    }

    /// Loads a config file. A relative `rules` path is taken relative to
    /// the config file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;
        if let (Some(rules), Some(dir)) = (&config.rules, path.parent()) {
            if rules.is_relative() {
                config.rules = Some(dir.join(rules));
            }
        }
        Ok(config)
    }

    pub fn options(&self) -> ReportOptions {
        ReportOptions {
            columns: self.columns.clone(),
            threshold: self.threshold,
        }
    }

    pub fn rule_table(&self) -> Result<RuleTable, RulesError> {
        match &self.rules {
            Some(path) => RuleTable::load(path),
            None => Ok(RuleTable::default()),
        }
    }
}
