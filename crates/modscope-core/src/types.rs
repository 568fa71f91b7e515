//! Request and response types of the moderation service

use crate::error::ModerationError;
use modscope_types::{Role, ScopeKind, ScopeRecord, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authenticated user issuing a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// Caller id
    pub user_id: UserId,
    /// Caller role, as established by the session layer
    pub role: Role,
}

impl Caller {
    /// Create caller
    #[inline]
    #[must_use]
    pub fn new(user_id: impl Into<UserId>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// Create admin caller
    #[inline]
    #[must_use]
    pub fn admin(user_id: impl Into<UserId>) -> Self {
        Self::new(user_id, Role::Admin)
    }

    /// Reject non-admin callers
    ///
    /// # Errors
    /// `ModerationError::Unauthorized` unless the role is admin
    pub fn require_admin(&self) -> Result<(), ModerationError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(ModerationError::Unauthorized {
                caller: self.user_id.clone(),
            })
        }
    }
}

/// Result shape returned to the admin UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Whether the action committed
    pub success: bool,
    /// Reason for failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionOutcome {
    /// Successful outcome
    #[inline]
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// Failed outcome with reason
    #[inline]
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(reason.into()),
        }
    }

    /// Outcome of any operation result
    #[must_use]
    pub fn from_result<T, E: fmt::Display>(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => Self::ok(),
            Err(err) => Self::failed(err.to_string()),
        }
    }
}

/// Current scope of a moderator and its label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeInfo {
    /// Scope row, `None` without a scope
    pub scope: Option<ScopeRecord>,
    /// Label of that row
    pub description: Option<String>,
}

/// Entry of the admin scope directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeSummary {
    /// Moderator id
    pub moderator_id: UserId,
    /// Selector strategy
    pub scope_type: ScopeKind,
    /// Label of the scope
    pub description: String,
}
