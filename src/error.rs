//! Error types for the camera manager

use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Transport/link errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Command link closed")]
    LinkClosed,

    #[error("Send failed: {0}")]
    SendFailed(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, Error>;
