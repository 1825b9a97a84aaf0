//! Greeter server: serves `Greet` until the process is killed.

use anyhow::{Context, Result};
use clap::Parser;
use greetrpc::{greeter, logging};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "greeter-server")]
#[command(about = "Serves the greeter RPC service")]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = greeter::DEFAULT_PORT)]
    port: u16,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.debug);

    let addr = (args.host.as_str(), args.port);
    let listener = greeter::server()
        .bind(addr)
        .await
        .with_context(|| format!("failed to bind server to {}:{}", args.host, args.port))?;

    info!(
        "{} server running on port {}",
        greeter::SERVICE_NAME,
        listener.local_addr()?.port()
    );
    listener.serve().await.context("accepting connections")
}
