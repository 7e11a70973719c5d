//! MES access-control operator console.

#![forbid(unsafe_code)]

mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;

use crate::cli::Cli;
use crate::config::{ConsoleConfig, init_tracing};
use crate::error::ConsoleResult;

#[tokio::main]
async fn main() -> ConsoleResult<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let mut config = ConsoleConfig::load()?;
    if let Some(api_url) = cli.api_url.clone() {
        config.api_url = api_url;
    }
    if let Some(session_file) = cli.session_file.clone() {
        config.session_file = session_file;
    }

    commands::run(cli, config).await
}
