//! Unified error type for the simulation service.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the runner, the persistence layer and configuration loading.
///
/// Simulator faults (missing executable, timeouts, non-zero exits) never appear
/// here; the runner absorbs them and falls back to mock data.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// The requested (or default) input definition file does not exist
    #[error("{}", path.display())]
    InputNotFound {
        /// Path that was checked
        path: PathBuf,
    },

    /// Catch-all for failures during a simulation run
    #[error("Simulation failed: {message}")]
    Simulation {
        /// Underlying cause
        message: String,
    },

    /// A simulation id that has no persisted run
    #[error("Simulation not found: {simulation_id}")]
    RunNotFound {
        /// The id that was looked up
        simulation_id: String,
    },

    /// Query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem or socket failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
