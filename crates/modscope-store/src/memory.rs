//! In-memory stores
//!
//! Keyed on [`DashMap`] so reads run concurrently and each key has a single
//! writer at a time (its shard lock).

use crate::error::StoreError;
use crate::traits::{EntityGraph, ScopeStore, UserDirectory};
use async_trait::async_trait;
use dashmap::DashMap;
use modscope_types::{Entity, EntityId, Relationship, Role, Scope, ScopeRecord, UserId};

/// Scope rows keyed by moderator
#[derive(Debug, Default)]
pub struct MemoryScopeStore {
    rows: DashMap<UserId, ScopeRecord>,
}

impl MemoryScopeStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows are stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl ScopeStore for MemoryScopeStore {
    async fn get(&self, moderator: &UserId) -> Result<Option<ScopeRecord>, StoreError> {
        Ok(self.rows.get(moderator).map(|row| row.value().clone()))
    }

    async fn replace(
        &self,
        moderator: &UserId,
        scope: Scope,
        acting_admin: Option<UserId>,
    ) -> Result<ScopeRecord, StoreError> {
        let record = ScopeRecord::new(moderator.clone(), scope, acting_admin);

        // Delete and insert collapse into one swap under the shard lock,
        // so there is no window without a row and no field-level merge.
        let previous = self.rows.insert(moderator.clone(), record.clone());

        tracing::debug!(
            moderator = %moderator,
            row = %record.id,
            replaced = previous.is_some(),
            "scope row replaced"
        );
        Ok(record)
    }

    async fn remove(&self, moderator: &UserId) -> Result<bool, StoreError> {
        Ok(self.rows.remove(moderator).is_some())
    }

    async fn list(&self) -> Result<Vec<ScopeRecord>, StoreError> {
        let mut rows: Vec<ScopeRecord> = self.rows.iter().map(|r| r.value().clone()).collect();
        rows.sort_by(|a, b| a.moderator_id.cmp(&b.moderator_id));
        Ok(rows)
    }
}

/// Entities and parent→child edges
#[derive(Debug, Default)]
pub struct MemoryEntityGraph {
    entities: DashMap<EntityId, Entity>,
    edges: DashMap<(EntityId, EntityId), Relationship>,
}

impl MemoryEntityGraph {
    /// Create empty graph
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entity
    pub fn insert_entity(&self, entity: Entity) {
        self.entities.insert(entity.id.clone(), entity);
    }

    /// Delete an entity together with every edge touching it
    pub fn remove_entity(&self, id: &EntityId) -> Option<Entity> {
        let removed = self.entities.remove(id).map(|(_, e)| e);
        if removed.is_some() {
            self.edges
                .retain(|(parent, child), _| parent != id && child != id);
        }
        removed
    }

    /// Rename an entity in place; returns false if it does not exist
    pub fn rename(&self, id: &EntityId, name: impl Into<String>) -> bool {
        match self.entities.get_mut(id) {
            Some(mut entity) => {
                entity.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Store a parent→child edge
    pub fn link(&self, relationship: Relationship) {
        let key = (
            relationship.parent_entity_id.clone(),
            relationship.child_entity_id.clone(),
        );
        self.edges.insert(key, relationship);
    }

    /// Drop a parent→child edge
    pub fn unlink(&self, parent: &EntityId, child: &EntityId) -> Option<Relationship> {
        self.edges
            .remove(&(parent.clone(), child.clone()))
            .map(|(_, r)| r)
    }

    /// Number of entities
    #[inline]
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of edges
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[async_trait]
impl EntityGraph for MemoryEntityGraph {
    async fn get_by_id(&self, id: &EntityId) -> Result<Option<Entity>, StoreError> {
        Ok(self.entities.get(id).map(|e| e.value().clone()))
    }

    async fn get_direct_child(
        &self,
        parent: &EntityId,
        child: &EntityId,
    ) -> Result<Option<Relationship>, StoreError> {
        Ok(self
            .edges
            .get(&(parent.clone(), child.clone()))
            .map(|r| r.value().clone()))
    }
}

/// User roles keyed by user id
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    roles: DashMap<UserId, Role>,
}

impl MemoryUserDirectory {
    /// Create empty directory
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user
    pub fn insert(&self, user: UserId, role: Role) {
        self.roles.insert(user, role);
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn role_of(&self, user: &UserId) -> Result<Option<Role>, StoreError> {
        Ok(self.roles.get(user).map(|r| *r.value()))
    }

    async fn set_role(&self, user: &UserId, role: Role) -> Result<Option<Role>, StoreError> {
        Ok(self
            .roles
            .get_mut(user)
            .map(|mut current| std::mem::replace(current.value_mut(), role)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modscope_types::EntityType;

    #[tokio::test]
    async fn replace_overwrites_whole_row() {
        let store = MemoryScopeStore::new();
        let m = UserId::new("mod-1");

        let first = store
            .replace(
                &m,
                Scope::City {
                    state: "Maharashtra".into(),
                    city: "Mumbai".into(),
                },
                Some(UserId::new("admin-1")),
            )
            .await
            .unwrap();

        let second = store
            .replace(
                &m,
                Scope::Entity {
                    entity_id: EntityId::new("org-1"),
                },
                Some(UserId::new("admin-2")),
            )
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_ne!(first.id, second.id);

        let row = store.get(&m).await.unwrap().unwrap();
        assert_eq!(row, second);
        assert!(row.scope.state().is_none());
        assert!(row.scope.city().is_none());
        assert_eq!(row.updated_by, Some(UserId::new("admin-2")));
    }

    #[tokio::test]
    async fn remove_reports_existence() {
        let store = MemoryScopeStore::new();
        let m = UserId::new("mod-1");
        assert!(!store.remove(&m).await.unwrap());

        store.replace(&m, Scope::All, None).await.unwrap();
        assert!(store.remove(&m).await.unwrap());
        assert!(store.get(&m).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_ordered_by_moderator() {
        let store = MemoryScopeStore::new();
        for id in ["mod-c", "mod-a", "mod-b"] {
            store.replace(&UserId::new(id), Scope::All, None).await.unwrap();
        }
        let ids: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.moderator_id.to_string())
            .collect();
        assert_eq!(ids, ["mod-a", "mod-b", "mod-c"]);
    }

    #[tokio::test]
    async fn edges_are_directed() {
        let graph = MemoryEntityGraph::new();
        graph.link(Relationship::new("org-1", "person-2"));

        let parent = EntityId::new("org-1");
        let child = EntityId::new("person-2");
        assert!(graph.get_direct_child(&parent, &child).await.unwrap().is_some());
        assert!(graph.get_direct_child(&child, &parent).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn removing_entity_drops_its_edges() {
        let graph = MemoryEntityGraph::new();
        graph.insert_entity(Entity::new("org-1", "Org", EntityType::Organization));
        graph.insert_entity(Entity::new("person-2", "P", EntityType::Person));
        graph.link(Relationship::new("org-1", "person-2"));

        assert!(graph.remove_entity(&EntityId::new("person-2")).is_some());
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.entity_count(), 1);
    }

    #[tokio::test]
    async fn set_role_returns_previous() {
        let users = MemoryUserDirectory::new();
        let u = UserId::new("user-1");
        assert_eq!(users.set_role(&u, Role::Moderator).await.unwrap(), None);

        users.insert(u.clone(), Role::User);
        assert_eq!(
            users.set_role(&u, Role::Moderator).await.unwrap(),
            Some(Role::User)
        );
        assert_eq!(users.role_of(&u).await.unwrap(), Some(Role::Moderator));
    }
}
