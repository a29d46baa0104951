//! Unified error types for the docker-decompose workspace.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum DecomposeError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// A compose or env file could not be interpreted.
    #[error("failed to load compose from '{}': {message}", path.display())]
    Parse {
        /// File being loaded.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// The in-scope services depend on each other in a cycle.
    #[error("dependency cycle between services: {}", services.join(", "))]
    DependencyCycle {
        /// Services taking part in the cycle, in declaration order.
        services: Vec<String>,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, DecomposeError>;
