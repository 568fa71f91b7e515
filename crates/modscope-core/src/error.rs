//! Error types for modscope Core

use modscope_authz::ValidatorError;
use modscope_store::{StoreError, WorldError};
use modscope_types::{UserId, ValidationError};
use std::path::PathBuf;

/// Failure of an administrative operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModerationError {
    /// Caller is not an admin
    #[error("unauthorized: {caller} is not an admin")]
    Unauthorized {
        /// Rejected caller
        caller: UserId,
    },

    /// Scope payload was rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Target user does not exist
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Write did not commit; prior state is unchanged
    #[error("persistence failed: {0}")]
    Persistence(#[source] StoreError),

    /// Read failed or timed out
    #[error("lookup failed: {0}")]
    Lookup(#[source] StoreError),
}

impl ModerationError {
    /// Check if retrying the same request may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Persistence(err) | Self::Lookup(err) => err.is_retryable(),
            Self::Unauthorized { .. } | Self::Validation(_) | Self::UserNotFound(_) => false,
        }
    }

    /// Check if the request itself was at fault
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. } | Self::Validation(_) | Self::UserNotFound(_)
        )
    }
}

impl From<ValidatorError> for ModerationError {
    fn from(err: ValidatorError) -> Self {
        match err {
            ValidatorError::Invalid(err) => Self::Validation(err),
            ValidatorError::Lookup(err) => Self::Lookup(err),
        }
    }
}

/// Failure to load configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Failure to build a service from a world fixture
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// Fixture is inconsistent
    #[error(transparent)]
    World(#[from] WorldError),

    /// A seeded scope could not be applied
    #[error("scope for {moderator}: {source}")]
    Scope {
        /// Moderator named by the seed
        moderator: UserId,
        /// Why it was rejected
        #[source]
        source: ModerationError,
    },
}
