//! Room-based WebSocket message relay.
//!
//! Clients connect, send a join message naming a room, and every later message
//! is relayed to the other occupants of that room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --addr 127.0.0.1:3000
//! PORT=3000 cargo run --bin hiroba-server
//! ```

use std::sync::Arc;

use clap::Parser;
use hiroba_server::{config::Args, domain::Registry, ui::Server};
use hiroba_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), "debug");

    let args = Args::parse();

    // One registry for the whole process, shared by every connection
    let registry = Arc::new(Registry::new());

    let server = Server::new(registry);
    if let Err(e) = server.run(&args.addr).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
