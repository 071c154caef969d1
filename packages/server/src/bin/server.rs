//! Chit Chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chitchat-server -- --port 50051
//! ```

use std::{path::PathBuf, time::Duration};

use chitchat_server::{ServerConfig, config::DEFAULT_PORT};
use chitchat_shared::{LogSink, init_logger};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "chitchat-server")]
#[command(about = "Lamport-clocked Chit Chat relay server", long_about = None)]
struct Args {
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// WebSocket ping period in seconds (0 disables)
    #[arg(long, default_value_t = 15)]
    heartbeat_secs: u64,

    /// Directory for log files
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let sink = LogSink::File {
        dir: args.log_dir,
        console: true,
    };
    match init_logger("server", &args.log_level, &sink) {
        Ok(Some(path)) => tracing::info!("Logging to {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Failed to initialize logger: {e}");
            std::process::exit(1);
        }
    }

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        heartbeat: (args.heartbeat_secs > 0).then(|| Duration::from_secs(args.heartbeat_secs)),
    };

    if let Err(e) = chitchat_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
