//! Store error taxonomy
//!
//! Every failure is scoped to the single invoking call and reported as a
//! distinguishable variant. The store never retries; retry policy, if any,
//! belongs to the consumer.

use thiserror::Error;

use crate::substrate::SubstrateError;

/// Errors returned by store and session operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// `get`/`update` referenced a document id that does not exist
    #[error("No document with id '{id}' in collection '{collection}'")]
    NotFound {
        collection: &'static str,
        id: String,
    },

    /// Reading the current session while none is persisted
    #[error("Not authenticated: no active session")]
    Unauthenticated,

    /// Login with no matching email and secret pair
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Create with an id that already exists, under the `reject` policy
    #[error("Document id '{id}' already exists in collection '{collection}'")]
    DuplicateId {
        collection: &'static str,
        id: String,
    },

    /// A record failed boundary validation on create or update
    #[error("Invalid {collection} record: {reason}")]
    InvalidRecord {
        collection: &'static str,
        reason: String,
    },

    /// The persistence substrate is inaccessible
    #[error(transparent)]
    Substrate(#[from] SubstrateError),

    /// A stored blob could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
