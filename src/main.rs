// ==========================================
// Brand backfill - CLI entry
// ==========================================
// Exit status: 0 when the run completes (even with row errors),
// 1 on any fatal error before or around the row loop
// ==========================================

use anyhow::Context;
use brand_backfill::config::{ConfigFile, ConnectionLayer, ReconcileConfig};
use brand_backfill::{logging, run_backfill, BackfillRequest, ReconciliationOutcome};
use clap::Parser;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "brand-backfill")]
#[command(about = "Fill missing product brand links from a product sheet", version)]
struct Cli {
    /// Product sheet (.csv, .xlsx, .xlsm, .xls, .xlsb, .ods)
    input: PathBuf,

    /// Worksheet name (default: first sheet)
    #[arg(long)]
    sheet: Option<String>,

    /// TOML file with [database] and [schema] tables
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Dotenv file with DB_* credentials; skipped when absent
    #[arg(long = "env", value_name = "PATH", default_value = ".env")]
    env_file: PathBuf,

    #[arg(long)]
    db_host: Option<String>,

    #[arg(long)]
    db_port: Option<u16>,

    #[arg(long)]
    db_user: Option<String>,

    #[arg(long)]
    db_password: Option<String>,

    /// Database name or SQLite file path
    #[arg(long)]
    db_name: Option<String>,

    /// Evaluate every row, then roll everything back
    #[arg(long)]
    dry_run: bool,

    /// Print the outcome as JSON instead of the text summary
    #[arg(long)]
    json: bool,

    /// Debug logging (RUST_LOG still wins)
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Cli {
    fn connection_layer(&self) -> ConnectionLayer {
        ConnectionLayer {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            database: self.db_name.clone(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    tracing::info!(version = brand_backfill::VERSION, "brand-backfill starting");

    match run(&cli) {
        Ok(outcome) => {
            if let Err(e) = report(&outcome, cli.json) {
                eprintln!("Error: {:#}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "run aborted");
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ReconciliationOutcome> {
    let file = match &cli.config {
        Some(path) => Some(ConfigFile::load(path)?),
        None => None,
    };
    // process variables win over the .env file
    let env = ConnectionLayer::from_env_file(&cli.env_file)?
        .unwrap_or_default()
        .merge(ConnectionLayer::from_process_env()?);
    let config = ReconcileConfig::assemble(file, env, cli.connection_layer())?;

    let request = BackfillRequest {
        input: cli.input.clone(),
        sheet: cli.sheet.clone(),
        dry_run: cli.dry_run,
    };
    let outcome = run_backfill(&config, &request)
        .with_context(|| format!("backfill from {} failed", cli.input.display()))?;
    Ok(outcome)
}

fn report(outcome: &ReconciliationOutcome, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        println!("{}", outcome);
    }
    Ok(())
}
