#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! deployer — helpers for deploying hubs from CI.

mod auth;
mod cli;
mod commands;
mod config;
mod console;
mod errors;
mod plan;
mod process;
mod secrets;
mod types;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, OutputCtx, write_error};
use config::Tools;
use types::ErrorOutput;

/// Log to stderr so stdout stays clean for decrypted plaintext and JSON.
fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let tools = Tools::from(&cli.tools);
    let ctx = OutputCtx::new(cli.output, cli.json, tools.tput.clone());

    match commands::dispatch(&cli.command, &ctx, &tools) {
        Ok(()) => {}
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            let error_output = ErrorOutput::from_error(&err);
            write_error(&error_output, cli.output, cli.json, &tools.tput);
            std::process::exit(err.exit_code());
        }
    }
}
