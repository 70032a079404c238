use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tally_core::Money;
use tally_report::{report_from_file, ReportConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Clean, categorize and summarize transaction exports")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a report from a CSV export and print it as JSON
    Report {
        /// Transactions file (.csv)
        input: PathBuf,

        #[command(flatten)]
        settings: Settings,

        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the active category rules as JSON, in match order
    Rules {
        /// TOML config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// TOML rule table (overrides the config file)
        #[arg(long)]
        rules: Option<PathBuf>,
    },
}

/// Command-line overrides layered on top of the config file.
#[derive(Args, Debug)]
struct Settings {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// TOML rule table (overrides the config file)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Flag transactions whose absolute amount reaches this value (default: 10000)
    #[arg(long)]
    threshold: Option<Decimal>,

    /// CSV field delimiter (default: ",")
    #[arg(long)]
    delimiter: Option<String>,

    #[arg(long)]
    date_col: Option<String>,

    #[arg(long)]
    description_col: Option<String>,

    #[arg(long)]
    amount_col: Option<String>,

    #[arg(long, conflicts_with = "no_type")]
    type_col: Option<String>,

    /// Ignore any type column and infer types from amount signs
    #[arg(long)]
    no_type: bool,
}

impl Settings {
    fn resolve(self) -> Result<ReportConfig> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(rules) = self.rules {
            config.rules = Some(rules);
        }
        if let Some(threshold) = self.threshold {
            config.threshold = Money::new(threshold);
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if let Some(date) = self.date_col {
            config.columns.date = date;
        }
        if let Some(description) = self.description_col {
            config.columns.description = description;
        }
        if let Some(amount) = self.amount_col {
            config.columns.amount = amount;
        }
        if let Some(tx_type) = self.type_col {
            config.columns.tx_type = Some(tx_type);
        }
        if self.no_type {
            config.columns.tx_type = None;
        }
        Ok(config)
    }
}

fn load_config(path: Option<&Path>) -> Result<ReportConfig> {
    match path {
        Some(path) => ReportConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(ReportConfig::default()),
    }
}

fn init_tracing() {
    // Logs go to stderr; stdout carries only the JSON output.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Report {
            input,
            settings,
            pretty,
        } => {
            let config = settings.resolve()?;
            let report = report_from_file(&input, &config)
                .with_context(|| format!("building report from {}", input.display()))?;

            if report.summary.count < report.input_count {
                tracing::warn!(
                    dropped = report.input_count - report.summary.count,
                    "some rows had no usable date, amount or description"
                );
            }

            let json = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{json}");
        }

        Command::Rules { config, rules } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(rules) = rules {
                config.rules = Some(rules);
            }
            let table = config.rule_table().context("loading category rules")?;
            let rules: Vec<_> = table.rules().collect();
            println!("{}", serde_json::to_string_pretty(&rules)?);
        }
    }

    Ok(())
}
