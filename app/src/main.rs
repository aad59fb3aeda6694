use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use tracing::info;
use tracing_subscriber::EnvFilter;

mod browser;
mod config;
mod coordinator;
mod detail;
mod dispatch;
mod error;
mod filters;
mod genres;
mod models;
mod pagination;
mod tui;
mod yts;

use crate::config::Config;
use crate::yts::YtsClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::new()?;
    init_tracing(&config)?;

    info!("Starting catalog browser against {}", config.api_base_url);

    let client = YtsClient::new(&config.api_base_url, config.request_timeout())?;
    info!("Catalog client initialized");

    tui::run(Arc::new(client), config.genre_sample_limit).await
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter)?)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}
