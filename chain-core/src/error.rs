//! Error types for the audit chain

use std::path::PathBuf;
use thiserror::Error;

/// Result type for chain operations
pub type Result<T> = std::result::Result<T, Error>;

/// Chain errors
#[derive(Error, Debug)]
pub enum Error {
    /// The secure entropy source could not produce a value. The in-flight
    /// generation call is aborted; no partial results are returned.
    #[error("entropy source failure: {0}")]
    Entropy(#[from] rand::Error),

    /// Record or block encoding failed; the block is not sealed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A durable block unit could not be parsed at startup.
    #[error("corrupt block file {path:?}: {source}")]
    Corrupt {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying parse failure.
        source: serde_json::Error,
    },

    /// A stored block fails hash recomputation or predecessor linkage.
    #[error("chain integrity violation: {0}")]
    ChainIntegrity(String),

    /// No durable unit exists for the requested block.
    #[error("block not found: {0}")]
    BlockNotFound(u64),

    /// Metrics registration error
    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}
