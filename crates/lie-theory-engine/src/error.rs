//! Error types for the Lie Theory engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup, the simulation run, and result output.

use std::path::PathBuf;

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: lie_theory_core::config::ConfigError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: lie_theory_core::runner::RunnerError,
    },

    /// The snapshot could not be serialized.
    #[error("snapshot serialization failed: {source}")]
    Serialize {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The snapshot could not be written.
    #[error("failed to write snapshot to {path}: {source}")]
    Output {
        /// Destination that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
