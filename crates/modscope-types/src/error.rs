//! Validation errors for scope payloads
//!
//! Every variant is recoverable and its message is the reason string
//! shown to the admin who submitted the payload.

use crate::ids::EntityId;
use crate::scope::ScopeKind;

/// Rejection of a proposed scope payload
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Scope type tag is not one of `all | state | city | entity`
    #[error("invalid scope type: '{0}'")]
    InvalidScopeType(String),

    /// Selector field required by the scope kind was not supplied
    #[error("{field} is required for {kind} scope")]
    MissingField {
        /// Name of the missing field
        field: &'static str,
        /// Scope kind that requires it
        kind: ScopeKind,
    },

    /// Region is empty or not in the reference catalog
    #[error("invalid state: '{0}'")]
    InvalidState(String),

    /// City name is blank or too long
    #[error("invalid city name: '{city}' (1..={max_len} characters after trimming)")]
    InvalidCity {
        /// Submitted city name
        city: String,
        /// Maximum accepted length
        max_len: usize,
    },

    /// Scoped entity does not exist
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),
}

impl ValidationError {
    /// Create missing field error
    #[inline]
    #[must_use]
    pub fn missing(field: &'static str, kind: ScopeKind) -> Self {
        Self::MissingField { field, kind }
    }
}
