//! Chit Chat interactive client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chitchat-client -- Bob localhost:50051
//! ```

use std::path::PathBuf;

use chitchat_client::{ClientConfig, DEFAULT_SERVER_ADDR, run_client};
use chitchat_server::domain::ClientId;
use chitchat_shared::{LogSink, init_logger};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "chitchat-client")]
#[command(about = "Chit Chat client with a local Lamport clock", long_about = None)]
struct Args {
    /// Identity shown to other participants
    client_id: String,

    /// Server address (host:port)
    #[arg(default_value = DEFAULT_SERVER_ADDR)]
    server_addr: String,

    /// Directory for log files
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let client_id = match ClientId::new(args.client_id.trim().to_string()) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Invalid client id: {e}");
            std::process::exit(1);
        }
    };

    // Log to file only so the prompt stays readable
    let sink = LogSink::File {
        dir: args.log_dir,
        console: false,
    };
    if let Err(e) = init_logger(&format!("client-{client_id}"), &args.log_level, &sink) {
        eprintln!("Failed to initialize logger: {e}");
        std::process::exit(1);
    }

    let config = ClientConfig {
        client_id,
        server_addr: args.server_addr,
    };
    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
