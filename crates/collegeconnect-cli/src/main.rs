//! collegeconnect - command line client for CollegeConnect.
//!
//! This is a thin front end over the `collegeconnect` library. It plays the
//! role of the view layer: every data command renders loading, error, empty
//! or content, and a rejected credential sends the user back to login.

mod cli;
mod commands;
mod output;
mod session;

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use session::CliSession;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.json_logs);

    let session = CliSession::open(&cli.api_url, cli.data_dir.as_deref())?;
    let logging_in = matches!(cli.command, Commands::Login(_));
    let result = commands::handle(cli.command, &session).await;

    // A rejected login token already reports its own failure.
    if session.redirected_to_login() && !logging_in {
        output::error("Your session has expired. Run 'collegeconnect login' to sign in again.");
        return result.and(Err(anyhow!("Session expired")));
    }

    result
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
