//! quill - CLI tool for the blog backend.
//!
//! A thin wrapper over `quill-http`'s `BlogApi`. Credentials are kept in a
//! file store so a login survives between runs.

mod cli;
mod commands;
mod output;
mod session;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::Cli;
use session::Session;

const UNREACHABLE: &str = "could not reach the server, check the backend is running";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let session = Session::new(cli.api_base, cli.store, cli.timeout.map(Duration::from_secs));
    match commands::handle(cli.command, &session).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            output::error(&describe(&err));
            ExitCode::FAILURE
        }
    }
}

/// The message shown for a failed command.
fn describe(err: &anyhow::Error) -> String {
    let unreachable = err.chain().any(|cause| {
        cause
            .downcast_ref::<quill_core::Error>()
            .is_some_and(quill_core::Error::is_network_unavailable)
    });
    if unreachable {
        UNREACHABLE.to_string()
    } else {
        format!("{:#}", err)
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
