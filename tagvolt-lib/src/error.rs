use std::io;
use thiserror::Error;

/// The primary error type for the `tagvolt-lib` library.
#[derive(Error, Debug)]
pub enum TagError {
    #[error("malformed hex input: {reason}")]
    MalformedHex { reason: String },

    #[error("tag link unavailable: {0}")]
    TransportUnavailable(String),

    #[error("transport I/O error: {0}")]
    TransportIo(String),

    #[error("invalid config response: {detail}")]
    InvalidConfigResponse { detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("timeout waiting for tag response: {0}")]
    Timeout(#[from] tokio::time::error::Elapsed),
}
