use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use extracto_parse::{parse_source, review_export, EngineConfig, FormFeedText, PageFiles};
use tracing_subscriber::EnvFilter;

mod output;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "extracto", version, about = "Turn bank statement text into transaction records")]
struct Cli {
    /// Statement layout: bbva, banbajio, banamex or banorte
    #[arg(long)]
    bank: String,

    /// Year the statement covers; movement dates only print day and month
    #[arg(long)]
    year: i32,

    /// TOML file with extra per-bank noise and section rules
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Export even when the layout asks for the last record to be reviewed
    #[arg(long)]
    confirm: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,

    /// Page text files in document order; form feeds inside a file split
    /// pages. Reads standard input when none are given.
    pages: Vec<PathBuf>,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let parsed = if cli.pages.is_empty() {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading statement text from stdin")?;
        parse_source(&cli.bank, &FormFeedText::new(text), cli.year, &config)
    } else {
        parse_source(&cli.bank, &PageFiles::new(cli.pages.clone()), cli.year, &config)
    };
    let statement = parsed.with_context(|| format!("parsing {} statement", cli.bank.trim()))?;

    if let Err(pending) = review_export(&statement, cli.confirm) {
        eprintln!("{pending}");
        serde_json::to_writer_pretty(io::stderr(), &pending.last_record)?;
        eprintln!();
        return Ok(ExitCode::from(2));
    }

    let stdout = io::stdout().lock();
    match cli.format {
        Format::Json => output::write_json(&statement, stdout)?,
        Format::Csv => output::write_csv(&statement, stdout)?,
    }
    Ok(ExitCode::SUCCESS)
}
