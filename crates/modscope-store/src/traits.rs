//! Collaborator contracts
//!
//! Object-safe async traits so the core can hold `Arc<dyn ...>` handles to
//! whatever backend is wired in.

use crate::error::StoreError;
use async_trait::async_trait;
use modscope_types::{Entity, EntityId, Relationship, Role, Scope, ScopeRecord, UserId};

/// Persistent scope rows, at most one per moderator
#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait ScopeStore: Send + Sync {
    /// Current scope row of a moderator
    async fn get(&self, moderator: &UserId) -> Result<Option<ScopeRecord>, StoreError>;

    /// Replace the moderator's row with a freshly stamped one
    ///
    /// Runs as one atomic unit: concurrent readers see either the previous
    /// row or the new one, and a failure leaves the previous row in place.
    async fn replace(
        &self,
        moderator: &UserId,
        scope: Scope,
        acting_admin: Option<UserId>,
    ) -> Result<ScopeRecord, StoreError>;

    /// Delete the moderator's row; returns whether one existed
    async fn remove(&self, moderator: &UserId) -> Result<bool, StoreError>;

    /// All rows, ordered by moderator id
    async fn list(&self) -> Result<Vec<ScopeRecord>, StoreError>;
}

/// Read-only view of the entity store
#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait EntityGraph: Send + Sync {
    /// Entity by id
    async fn get_by_id(&self, id: &EntityId) -> Result<Option<Entity>, StoreError>;

    /// Direct parent→child edge, if stored
    async fn get_direct_child(
        &self,
        parent: &EntityId,
        child: &EntityId,
    ) -> Result<Option<Relationship>, StoreError>;
}

/// User role store
#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Role of a user, `None` if the user is unknown
    async fn role_of(&self, user: &UserId) -> Result<Option<Role>, StoreError>;

    /// Set a user's role; returns the previous role, `None` if unknown
    async fn set_role(&self, user: &UserId, role: Role) -> Result<Option<Role>, StoreError>;
}
