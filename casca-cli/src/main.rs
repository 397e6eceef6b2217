use anyhow::{bail, Context, Result};
use casca_features::{aggregate, FeatureVector, StatementTotals, TrainingTable};
use casca_ingest::{
    parse_statement_pdf, read_table_csv, write_table_csv_path, ParseOutcome, StatementLayout, TransactionTable,
};
use casca_model::{LoanScorer, ScoreResult};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "casca",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CASCA_BUILD_SHA"), ")"),
    about = "Bank-statement parsing, financial indicators and loan scoring"
)]
struct Cli {
    /// Config file (default: $CASCA_HOME/config.toml or ~/.casca/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging to stderr (overrides log_level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a statement PDF into a Date/Description/In/Out/Balance CSV
    Extract {
        /// regex-line | tabular | token-columns | signed-running
        #[arg(long)]
        layout: StatementLayout,

        pdf: PathBuf,

        /// Output CSV (default: the PDF path with a .csv extension)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print lines that did not parse as transactions
        #[arg(long)]
        show_skipped: bool,
    },

    /// Aggregate per-entity statements into a labelled training table
    Features {
        /// ENTITY=PATH, repeatable. PATH is an extracted CSV, or a PDF when --layout is given
        #[arg(long = "entity", value_parser = parse_entity_arg, required = true)]
        entities: Vec<(String, PathBuf)>,

        /// Layout used for any PDF inputs
        #[arg(long)]
        layout: Option<StatementLayout>,

        #[arg(long, default_value = "training.csv")]
        out: PathBuf,
    },

    /// Train on a training table and decide one statement
    Score {
        #[arg(long, default_value = "training.csv")]
        training: PathBuf,

        #[arg(long)]
        layout: StatementLayout,

        pdf: PathBuf,

        /// Emit the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or create the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = config::resolve_config_path(cli.config.as_deref())?;
    let cfg = config::load_config(&config_path)?;
    init_logging(cli.verbose, &cfg.log_level);

    match cli.command {
        Command::Extract {
            layout,
            pdf,
            out,
            show_skipped,
        } => {
            let outcome = parse_pdf(layout, &pdf, &cfg)?;
            let out = out.unwrap_or_else(|| pdf.with_extension("csv"));
            write_table_csv_path(&outcome.table, &out).with_context(|| format!("writing {}", out.display()))?;

            println!(
                "Parsed {} transactions from {} ({} lines skipped)",
                outcome.table.len(),
                pdf.display(),
                outcome.skipped_count()
            );
            println!("Wrote {}", out.display());
            if show_skipped {
                for s in &outcome.skipped {
                    println!("  skipped line {}: {}", s.line_no, s.text);
                }
            }
        }

        Command::Features { entities, layout, out } => {
            let mut table = TrainingTable::new();
            for (entity, path) in &entities {
                let txns = load_statement(path, layout, &cfg)?;
                let features = aggregate(&txns, &cfg.aggregator_config());
                table
                    .insert(entity.as_str(), &features)
                    .with_context(|| format!("adding {entity}"))?;
                info!(%entity, transactions = txns.len(), "aggregated entity");
            }
            table
                .attach_labels(&cfg.label_map())
                .with_context(|| format!("labels come from [labels] in {}", config_path.display()))?;
            table
                .write_csv_path(&out)
                .with_context(|| format!("writing {}", out.display()))?;
            println!("Wrote {} entities to {}", table.len(), out.display());
        }

        Command::Score {
            training,
            layout,
            pdf,
            json,
        } => {
            if !training.exists() {
                bail!(
                    "training table not found: {} (run `casca features` first)",
                    training.display()
                );
            }
            let table = TrainingTable::read_csv_path(&training)
                .with_context(|| format!("reading {}", training.display()))?;
            let scorer = LoanScorer::train(&table, &cfg.scorer_config()).context("training loan scorer")?;

            let outcome = parse_pdf(layout, &pdf, &cfg)?;
            if outcome.table.is_empty() {
                warn!(pdf = %pdf.display(), "no transactions found, scoring an empty statement");
            }
            let totals = StatementTotals::from_table(&outcome.table);
            let mut vector = aggregate(&outcome.table, &cfg.aggregator_config()).to_vector();
            vector.extend(totals.to_vector());

            let result = scorer.score(&vector);
            if json {
                let report = ScoreReport {
                    statement: &pdf,
                    transactions: outcome.table.len(),
                    features: &vector,
                    result: &result,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_score(&pdf, &totals, &vector, &result);
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(cli.config.as_deref())?,
            ConfigCommand::Show => {
                println!("# {}", config_path.display());
                print!("{}", toml::to_string_pretty(&cfg)?);
            }
        },
    }

    Ok(())
}

#[derive(Serialize)]
struct ScoreReport<'a> {
    statement: &'a Path,
    transactions: usize,
    features: &'a FeatureVector,
    result: &'a ScoreResult,
}

fn init_logging(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_entity_arg(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((entity, path)) if !entity.trim().is_empty() && !path.is_empty() => {
            Ok((entity.trim().to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected ENTITY=PATH, got `{s}`")),
    }
}

fn parse_pdf(layout: StatementLayout, pdf: &Path, cfg: &Config) -> Result<ParseOutcome> {
    let bytes = fs::read(pdf).with_context(|| format!("reading {}", pdf.display()))?;
    parse_statement_pdf(layout, &bytes, &cfg.parse_options()).with_context(|| format!("parsing {}", pdf.display()))
}

fn load_statement(path: &Path, layout: Option<StatementLayout>, cfg: &Config) -> Result<TransactionTable> {
    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return read_table_csv(path).with_context(|| format!("reading {}", path.display()));
    }
    let Some(layout) = layout else {
        bail!("{} is a PDF; pass --layout to parse it", path.display());
    };
    Ok(parse_pdf(layout, path, cfg)?.table)
}

fn print_score(pdf: &Path, totals: &StatementTotals, vector: &FeatureVector, result: &ScoreResult) {
    println!("Statement: {}", pdf.display());
    println!(
        "  credits={:.2} debits={:.2} net={:.2} final balance={:.2}",
        totals.total_credits, totals.total_debits, totals.net_cash_flow, totals.final_balance
    );
    println!("\nFeatures:");
    for (name, value) in vector.iter() {
        match value {
            Some(v) => println!("  {name:<32} {v:.4}"),
            None => println!("  {name:<32} n/a"),
        }
    }
    println!("\nLoan Decision: {} (p={:.2})", result.decision, result.probability);
    println!("Reason:");
    for line in &result.explanations {
        println!("  - {line}");
    }
}
