//! # salon: car dealership client
//!
//! Composition root that wires an API adapter into the dealership caches
//! and runs one command against them.
//!
//! ## Responsibilities
//! - Parse CLI arguments and configuration (file, env vars)
//! - Install the `tracing` subscriber
//! - Pick the backend: the REST API over HTTP, or the in-memory demo
//!   backend when offline (sign in as `dealer`/`dealer` or `ola`/`ola123`;
//!   changes last for one invocation)
//! - Start the caches, sign in from `[session]` when no session is active,
//!   and run the command
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod cli;
mod commands;
mod config;
mod output;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use salon_adapter_http_reqwest::HttpApi;
use salon_adapter_memory::MemoryBackend;

use crate::cli::Cli;
use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    init_tracing(&config.logging.filter);

    if cli.offline || config.mode.offline {
        tracing::info!("using the in-memory demo backend");
        let backend = MemoryBackend::with_demo_data();
        commands::run(backend.client(), &config, cli.command).await
    } else {
        let api = HttpApi::new(&config.api).context("failed to build HTTP client")?;
        tracing::info!(base_url = %api.base_url(), "using the dealership API");
        commands::run(api, &config, cli.command).await
    }
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {filter:?} ({err}), using \"warn\"");
        EnvFilter::new("warn")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
