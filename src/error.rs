//! Error types for snapshot ingestion and configuration.

use thiserror::Error;

/// Errors that reject a snapshot at the ingestion boundary.
///
/// A rejected snapshot leaves the store's previous state in place.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The snapshot does not match the expected schema.
    #[error("Invalid snapshot: {0}")]
    Schema(#[from] serde_json::Error),

    /// An application has an empty id.
    #[error("Application with empty id in group {path}")]
    EmptyAppId { path: String },

    /// Two applications resolve to the same service name.
    #[error("Duplicate service {name}: {first} and {second}")]
    DuplicateService {
        name: String,
        first: String,
        second: String,
    },
}

/// Errors raised while loading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration sources could not be read or merged.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value is present but unusable.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
