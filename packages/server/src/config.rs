//! Command-line configuration.

use clap::Parser;

/// Port used when `PORT` is unset or empty.
pub const DEFAULT_PORT: &str = "8080";

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Room-based WebSocket message relay", long_about = None)]
pub struct Args {
    /// Address to listen on (host:port). Defaults to 0.0.0.0:$PORT, or 0.0.0.0:8080.
    #[arg(short = 'a', long, default_value_t = default_addr())]
    pub addr: String,
}

/// Default listen address, taking the port from the `PORT` environment variable.
pub fn default_addr() -> String {
    addr_for_port(std::env::var("PORT").ok())
}

fn addr_for_port(port: Option<String>) -> String {
    let port = port
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_PORT.to_string());
    format!("0.0.0.0:{}", port)
}
