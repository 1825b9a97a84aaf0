//! Greeter client: sends one `Greet` request and logs the reply.

use clap::Parser;
use greetrpc::{greeter, logging};

#[derive(Parser, Debug)]
#[command(name = "greeter-client")]
#[command(about = "Calls Greet once on a greeter server")]
struct Args {
    /// Server address
    #[arg(long, default_value = "127.0.0.1:50051")]
    addr: String,

    /// Name to greet
    #[arg(short, long, default_value = "World")]
    name: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    logging::init(args.debug);

    // The outcome is already logged; a failed call still exits normally.
    let _ = greeter::run_client(args.addr.as_str(), &args.name).await;
}
