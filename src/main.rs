//! jrpc-client - call `sayHello` and `foo` on a JSON-RPC server.
//!
//! Replies are printed to stdout; logs go to stderr. The process exits
//! non-zero when the server cannot be reached or `sayHello` fails.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jrpc_client::config::ClientConfig;
use jrpc_client::demo;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging (stderr keeps stdout reserved for replies)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "jrpc_client=info".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let config = ClientConfig::parse();
    tracing::info!(
        "Starting jrpc-client v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.addr
    );

    let mut stdout = io::stdout().lock();
    // Return an exit code instead of process::exit so destructors run
    match demo::run(&config, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
