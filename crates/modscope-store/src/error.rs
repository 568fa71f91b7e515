//! Store error types

use std::path::PathBuf;

/// Infrastructure failure of a collaborator store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Backend could not serve the request
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Operation did not complete within its deadline
    #[error("{operation} timed out after {millis}ms")]
    Timeout {
        /// Name of the timed-out operation
        operation: &'static str,
        /// Deadline that expired
        millis: u64,
    },

    /// Transaction was aborted and rolled back
    #[error("transaction aborted: {0}")]
    Aborted(String),
}

impl StoreError {
    /// Create unavailable error
    #[inline]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    /// Whether retrying the whole operation may succeed
    ///
    /// Every store failure leaves committed state untouched, so all of
    /// them are retryable.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::Timeout { .. } | Self::Aborted(_)
        )
    }
}

/// Failure to load a world fixture
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// IO error reading the fixture
    #[error("io error reading {path}: {source}")]
    Io {
        /// Fixture path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Malformed YAML fixture
    #[error("invalid yaml fixture: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed JSON fixture
    #[error("invalid json fixture: {0}")]
    Json(#[from] serde_json::Error),

    /// Relationship references an entity the fixture does not define
    #[error("relationship {parent} -> {child} references an unknown entity")]
    DanglingRelationship {
        /// Parent side
        parent: String,
        /// Child side
        child: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_names_operation() {
        let err = StoreError::Timeout {
            operation: "scope lookup",
            millis: 250,
        };
        assert_eq!(err.to_string(), "scope lookup timed out after 250ms");
        assert!(err.is_retryable());
    }
}
