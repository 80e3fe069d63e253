//! Server configuration and CLI arguments.

use clap::Parser;

/// Default listen address for the HTTP server.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:7780";

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the server binds, e.g. `127.0.0.1:7780`.
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
        }
    }
}

/// CLI arguments for the server binary.
#[derive(Parser, Debug)]
#[command(about = "docstore HTTP server")]
pub struct Args {
    /// Address to listen on.
    #[arg(short, long, default_value = DEFAULT_LISTEN)]
    pub listen: String,
}

impl Args {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> ServerConfig {
        ServerConfig {
            listen: self.listen.clone(),
        }
    }
}
