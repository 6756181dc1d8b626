//! Error types for registration and configuration.
//!
//! Parse failures live in [`ParseError`](crate::ParseError) and schema
//! problems in [`ValidationError`](crate::ValidationError); this module wraps
//! them for the two operations that can fail outright: registering a command
//! and loading a help configuration file.

use thiserror::Error;

use crate::ValidationError;

/// Errors returned by [`CommandRepository::register`](crate::CommandRepository::register).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The name is already registered and the repository rejects duplicates.
    #[error("command already registered: {0}")]
    DuplicateCommand(String),

    /// The command's name or option schema is malformed.
    #[error("invalid schema for command '{command}': {source}")]
    InvalidSchema {
        command: String,
        #[source]
        source: ValidationError,
    },
}

/// Errors that can occur while loading a help configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A flag declared in the configuration is malformed.
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;
