//! Gatehouse - identity and access gateway
//!
//! Async decision service answering allow/deny for every request a
//! fronting proxy forwards to it

#![allow(missing_docs)]

use clap::Parser;
use gatehouse_rs::server;
use std::process::ExitCode;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "gateway")]
#[command(about = "Identity and access gateway", version)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(
        short,
        long,
        env = "GATEHOUSE_CONFIG",
        default_value = "config/gateway.yaml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging system
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    match server::builder::run_server(&args.config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Print error using Display (not Debug) to preserve newlines
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
