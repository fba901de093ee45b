//! Error types for the triage_core library.

use crate::Condition;
use std::io;
use uuid::Uuid;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for triage_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Capacity store error
    #[error("Store error: {0}")]
    Store(String),

    /// A booking named a pool the store does not contain
    #[error("No hospital named '{0}'")]
    PoolNotFound(String),

    /// A withdrawal named a reservation the store does not contain
    #[error("No booking with id {0}")]
    ReservationNotFound(Uuid),

    /// Every candidate pool for a condition was exhausted
    #[error("No beds available for {0}")]
    NoCapacity(Condition),
}
