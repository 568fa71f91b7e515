//! Error types for validation and decisions

use modscope_store::StoreError;
use modscope_types::ValidationError;

/// Failure to validate a scope payload
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidatorError {
    /// Payload was rejected
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Entity existence could not be checked
    #[error("entity lookup failed: {0}")]
    Lookup(#[from] StoreError),
}

/// Infrastructure failure while deciding
///
/// Never surfaced to callers of `can_moderate`; it is logged and the
/// decision is deny.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecisionError {
    /// Moderator scope could not be read
    #[error("scope lookup failed: {0}")]
    Scope(#[source] StoreError),

    /// Target entity could not be read
    #[error("entity lookup failed: {0}")]
    Entity(#[source] StoreError),

    /// Relationship edge could not be read
    #[error("relationship lookup failed: {0}")]
    Relationship(#[source] StoreError),
}
