//! Parlor chat: host, dedicated server or client from one binary.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin parlor -- host --port 7777
//! cargo run --bin parlor -- server --listen 0.0.0.0 --max-participants 8
//! cargo run --bin parlor -- client --remote 192.168.1.10
//! ```

use std::{sync::Arc, time::Duration};

use clap::{Args, Parser, Subcommand};

use parlor_client::{
    presentation::TerminalSink,
    runner::run_interactive,
    session::{SessionConfig, SessionManager},
};
use parlor_server::{domain::DEFAULT_MAX_PARTICIPANTS, ui::shutdown_signal};
use parlor_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "parlor")]
#[command(about = "Minimal real-time chat over WebSocket", long_about = None)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Run a server and join it as a participant
    Host(SessionArgs),
    /// Run a dedicated server without a local participant
    Server(SessionArgs),
    /// Join a remote server
    Client(SessionArgs),
}

#[derive(Args, Debug)]
struct SessionArgs {
    /// Address to listen on (host / server)
    #[arg(short = 'l', long, default_value = "0.0.0.0")]
    listen: String,

    /// Server address to connect to (client)
    #[arg(short = 'r', long, default_value = "127.0.0.1")]
    remote: String,

    /// Port to listen on or connect to
    #[arg(short = 'p', long, default_value = "7777", value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,

    /// Roster capacity of the server
    #[arg(short = 'm', long, default_value_t = DEFAULT_MAX_PARTICIPANTS)]
    max_participants: usize,

    /// Number of rendered lines kept on screen
    #[arg(long, default_value = "100")]
    max_history: usize,

    /// Handshake timeout in milliseconds
    #[arg(long, default_value = "5000")]
    handshake_timeout_ms: u64,
}

impl From<SessionArgs> for SessionConfig {
    fn from(args: SessionArgs) -> Self {
        Self {
            listen_address: args.listen,
            remote_address: args.remote,
            port: args.port,
            max_participants: args.max_participants,
            max_history_rendered: args.max_history,
            handshake_timeout: Duration::from_millis(args.handshake_timeout_ms),
        }
    }
}

enum Start {
    Host,
    Server,
    Client,
}

async fn run(mode: Mode) -> Result<(), Box<dyn std::error::Error>> {
    let (config, start): (SessionConfig, Start) = match mode {
        Mode::Host(args) => (args.into(), Start::Host),
        Mode::Server(args) => (args.into(), Start::Server),
        Mode::Client(args) => (args.into(), Start::Client),
    };

    let sink = Arc::new(TerminalSink::new(config.max_history_rendered));
    let manager = Arc::new(SessionManager::new(config, sink.clone())?);

    match start {
        Start::Host => {
            manager.start_host().await?;
            run_interactive(manager, sink).await;
        }
        Start::Server => {
            manager.start_server().await?;
            shutdown_signal().await;
            manager.stop_server().await?;
        }
        Start::Client => {
            // A failed first connect is already reported; /connect retries
            let _ = manager.start_client().await;
            run_interactive(manager, sink).await;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let cli = Cli::parse();

    if let Err(e) = run(cli.mode).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
