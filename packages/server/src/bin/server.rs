//! Dedicated Parlor chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin parlor-server
//! cargo run --bin parlor-server -- --host 0.0.0.0 --port 3000 --max-participants 8
//! ```

use clap::Parser;

use parlor_server::{bootstrap::build_server, domain::DEFAULT_MAX_PARTICIPANTS};
use parlor_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "parlor-server")]
#[command(about = "Authoritative Parlor chat server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "7777", value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,

    /// Roster capacity; joins beyond it are rejected
    #[arg(short = 'm', long, default_value_t = DEFAULT_MAX_PARTICIPANTS, value_parser = parse_capacity)]
    max_participants: usize,
}

fn parse_capacity(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let server = build_server(args.max_participants);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
