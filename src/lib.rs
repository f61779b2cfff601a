use thiserror::Error;

/// Error types for the solmock library
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Failure to bind the listening socket; fatal at startup
    #[error("bind error: {0}")]
    Bind(std::io::Error),

    /// Per-connection I/O errors (accept, read, write)
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Timeout errors (client-side operations)
    #[error("timeout error: {0}")]
    Timeout(String),
}

/// Result type for the solmock library
pub type Result<T> = std::result::Result<T, ConsoleError>;

pub mod client;
pub mod config;
pub mod server;
pub mod session;
pub mod test_utils;

// Re-export main types for convenience
pub use client::{ClientConfig, ConsoleClient};
pub use config::ConsoleConfig;
pub use server::MockConsoleServer;
pub use session::Session;
