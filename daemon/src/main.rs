//! Charity daemon: entry point for running the transaction record store.

use std::path::PathBuf;

use anyhow::{bail, Context};
use charity_client::{render_latest_donations, RecordLog, RecordStoreClient};
use charity_node::{NodeConfig, RecordNode};
use charity_store_json::check_integrity;
use charity_types::TransactionRecord;
use charity_utils::LogFormat;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "charity-daemon", about = "Charity donation ledger record store")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "CHARITY_CONFIG")]
    config: Option<PathBuf>,

    /// Interface to bind (e.g. "0.0.0.0", "127.0.0.1").
    #[arg(long, env = "CHARITY_LISTEN_ADDR")]
    listen_addr: Option<String>,

    /// HTTP port of the record store.
    #[arg(long, env = "CHARITY_PORT")]
    port: Option<u16>,

    /// JSON file holding the records.
    #[arg(long, env = "CHARITY_DATA_FILE")]
    data_file: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "CHARITY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "CHARITY_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Run the record store server until SIGINT/SIGTERM.
    Serve,
    /// Check the data file and exit non-zero if it is unhealthy.
    Check,
    /// Talk to a running record store.
    Records {
        #[command(subcommand)]
        action: RecordsAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum RecordsAction {
    /// Print the latest donations.
    List {
        #[arg(long, env = "CHARITY_STORE_URL", default_value = "http://127.0.0.1:5004")]
        store_url: String,
    },
    /// Append one record given as a JSON object.
    Append {
        #[arg(long, env = "CHARITY_STORE_URL", default_value = "http://127.0.0.1:5004")]
        store_url: String,
        /// The record, e.g. '{"txHash":"0x..","amount":"0.5"}'.
        #[arg(long)]
        json: String,
    },
}

/// File settings first, then flags and env vars on top.
fn resolve_config(cli: &Cli) -> anyhow::Result<NodeConfig> {
    let base = match &cli.config {
        Some(path) => NodeConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => NodeConfig::default(),
    };

    Ok(NodeConfig {
        listen_addr: cli.listen_addr.clone().unwrap_or(base.listen_addr),
        port: cli.port.unwrap_or(base.port),
        data_file: cli.data_file.clone().unwrap_or(base.data_file),
        log_level: cli.log_level.clone().unwrap_or(base.log_level),
        log_format: cli.log_format.unwrap_or(base.log_format),
        ..base
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    charity_utils::init_logging(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!("loaded config from {}", path.display());
    }

    match cli.command {
        Command::Serve => {
            tracing::info!(
                "starting record store on {}:{} (data file {})",
                config.listen_addr,
                config.port,
                config.data_file.display()
            );
            let node = RecordNode::new(config)?;
            node.start().await?;
            tracing::info!("charity daemon exited cleanly");
        }
        Command::Check => {
            let report = check_integrity(&config.data_file);
            println!("data file:   {}", report.path.display());
            println!("exists:      {}", report.exists);
            println!("records:     {}", report.records);
            if !report.empty_records.is_empty() {
                println!("empty:       {:?}", report.empty_records);
            }
            if !report.non_object_records.is_empty() {
                println!("non-object:  {:?}", report.non_object_records);
            }
            for error in &report.errors {
                println!("error:       {error}");
            }
            if !report.is_healthy() {
                bail!("data file {} is unhealthy", report.path.display());
            }
            println!("status:      ok");
        }
        Command::Records { action } => match action {
            RecordsAction::List { store_url } => {
                let client = RecordStoreClient::new(store_url)?;
                let records = client.list_all().await?;
                print!("{}", render_latest_donations(&records));
            }
            RecordsAction::Append { store_url, json } => {
                let record = TransactionRecord::from_slice(json.as_bytes())
                    .context("--json must be a non-empty JSON object")?;
                let client = RecordStoreClient::new(store_url)?;
                client.append(&record).await?;
                println!("Transaction saved.");
            }
        },
    }

    Ok(())
}
