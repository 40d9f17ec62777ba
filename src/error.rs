//! Error type shared by every fallible gas map operation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GasMapError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Position ({x}, {y}) lies outside the mapped domain")]
    OutOfDomain { x: f64, y: f64 },
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "toml")]
    #[error("TOML error: {0}")]
    Toml(String),
}

impl GasMapError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GasMapError>;
