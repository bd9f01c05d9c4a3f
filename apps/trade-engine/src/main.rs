//! Trade Engine Binary
//!
//! Recomputes every trade of a ledger snapshot and prints the summaries as a
//! JSON array on stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin trade-engine -- demos/sample_ledger.json
//! ```
//!
//! # Environment Variables
//!
//! - `TRADE_ENGINE_CONFIG`: Path to the YAML config (default: `config.yaml` if present)
//! - `TRADE_ENGINE_LEDGER`: Ledger snapshot path when no argument is given
//! - `RUST_LOG`: Log filter, overrides the configured level

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::{error, info};
use trade_engine::application::use_cases::{LedgerPorts, RecomputeAllTradesUseCase};
use trade_engine::config::{Config, load_config};
use trade_engine::infrastructure::persistence::{InMemoryLedgerStore, LedgerSnapshot};
use trade_engine::observability::init_tracing;

/// Default config file looked up in the working directory.
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();

    let config = resolve_config()?;
    init_tracing(&config.observability.logging).context("failed to initialize logging")?;

    let ledger_path = ledger_path()?;
    info!(ledger = %ledger_path, "Loading ledger snapshot");

    let raw = std::fs::read_to_string(&ledger_path)
        .with_context(|| format!("failed to read ledger snapshot '{ledger_path}'"))?;
    let snapshot: LedgerSnapshot =
        serde_json::from_str(&raw).context("ledger snapshot is not valid JSON")?;

    info!(
        contracts = snapshot.contracts.len(),
        statements = snapshot.statements.len(),
        trades = snapshot.trades.len(),
        "Ledger snapshot loaded"
    );

    let store = Arc::new(InMemoryLedgerStore::from_snapshot(snapshot)?);
    let ports = LedgerPorts::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
    );

    let mut use_case = RecomputeAllTradesUseCase::new(ports, config.aggregation.aggregator());
    if let Some(model) = config.pricing.greeks_model() {
        use_case = use_case.with_greeks(model);
    }
    let report = use_case.execute().await?;

    for failure in &report.failed {
        error!(
            trade_id = %failure.trade_id,
            code = %failure.error.code,
            message = %failure.error.message,
            "Trade left flagged for recompute"
        );
    }

    println!("{}", serde_json::to_string_pretty(&report.updated)?);

    Ok(())
}

/// Load `.env` from the working directory or the nearest ancestor.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Explicit config path must exist; the default path is optional.
fn resolve_config() -> Result<Config> {
    if let Ok(path) = std::env::var("TRADE_ENGINE_CONFIG") {
        return load_config(Some(&path)).with_context(|| format!("failed to load config '{path}'"));
    }
    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        return load_config(None).context("failed to load config.yaml");
    }
    Ok(Config::default())
}

fn ledger_path() -> Result<String> {
    if let Some(path) = std::env::args().nth(1) {
        return Ok(path);
    }
    match std::env::var("TRADE_ENGINE_LEDGER") {
        Ok(path) => Ok(path),
        Err(_) => bail!("usage: trade-engine <ledger.json> (or set TRADE_ENGINE_LEDGER)"),
    }
}
