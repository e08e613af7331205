//! The scripted demo run: connect, `sayHello`, `foo`.
//!
//! Failures are split into two tiers. Connecting and `sayHello` are fatal:
//! the error is returned and nothing further is attempted. A failing `foo`
//! is reported on the output stream and the run still completes, printing
//! the zero-valued reply.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::models::{Args, Reply};
use crate::rpc::RpcClient;

/// Connect to the configured server and perform the demo calls.
///
/// Reply lines (`reply: <value>`) and the `foo` error text go to `out`.
/// The connection is closed before returning on success and dropped on
/// every error path.
pub async fn run<W: Write>(config: &ClientConfig, out: &mut W) -> Result<()> {
    let mut client = RpcClient::connect(&config.addr)
        .await
        .with_context(|| format!("dialing {}", config.addr))?;
    client.set_timeout(config.call_timeout());

    call_demo(&mut client, out).await?;

    client.close().await.context("closing connection")?;
    info!("Demo run complete");
    Ok(())
}

/// Issue `sayHello` then `foo` on an established connection.
pub async fn call_demo<W: Write>(client: &mut RpcClient, out: &mut W) -> Result<()> {
    let greeting: String = client
        .call("sayHello", &())
        .await
        .context("sayHello error")?;
    writeln!(out, "reply: {}", greeting)?;

    let args = Args::demo();
    let reply = match client.call::<_, Reply>("foo", &args).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("foo failed: {}", e);
            writeln!(out, "{}", e)?;
            Reply::default()
        }
    };
    writeln!(out, "reply: {}", reply)?;

    out.flush()?;
    Ok(())
}
