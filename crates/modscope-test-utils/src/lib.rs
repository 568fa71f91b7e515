//! Testing utilities for modscope workspace
//!
//! Shared fixtures and failure-injecting store wrappers.

#![allow(missing_docs)]

use async_trait::async_trait;
use modscope_core::{Caller, ModerationConfig, ModerationService};
use modscope_store::{
    EntityGraph, MemoryEntityGraph, MemoryScopeStore, ScopeStore, StoreError, World,
};
use modscope_types::{
    Entity, EntityId, EntityType, Relationship, Role, Scope, ScopeRecord, UserId,
};
use parking_lot::Mutex;
use std::sync::Arc;

pub use modscope_store::UserSeed;

pub const ADMIN: &str = "admin-1";
pub const MODERATOR: &str = "mod-1";
pub const PLAIN_USER: &str = "user-1";

/// Fixture with two scenarios:
/// - `a` in Mumbai and `b` in Pune, both Maharashtra
/// - `org-1` with direct child `person-2`, unrelated `person-3`, and
///   `person-4` reachable only through `person-2`
pub fn sample_world() -> World {
    World {
        entities: vec![
            Entity::new("a", "Gateway Trust", EntityType::Organization)
                .located("Maharashtra", "Mumbai"),
            Entity::new("b", "Shaniwar Wada Trust", EntityType::Organization)
                .located("Maharashtra", "Pune"),
            Entity::new("org-1", "Delhi Police", EntityType::Organization)
                .located("Delhi", "New Delhi"),
            Entity::new("person-2", "Kiran Bedi", EntityType::Person),
            Entity::new("person-3", "Arun Kumar", EntityType::Person)
                .located("Delhi", "New Delhi"),
            Entity::new("person-4", "Meera Iyer", EntityType::Person),
        ],
        relationships: vec![
            Relationship::new("org-1", "person-2").with_type("former_head_of"),
            Relationship::new("person-2", "person-4").with_type("mentor_of"),
        ],
        users: vec![
            user(ADMIN, Role::Admin),
            user(MODERATOR, Role::Moderator),
            user("mod-2", Role::Moderator),
            user(PLAIN_USER, Role::User),
        ],
        scopes: Vec::new(),
    }
}

fn user(id: &str, role: Role) -> UserSeed {
    UserSeed {
        id: UserId::new(id),
        name: None,
        role,
    }
}

pub fn admin() -> Caller {
    Caller::admin(ADMIN)
}

pub fn moderator() -> UserId {
    UserId::new(MODERATOR)
}

/// Service over in-memory stores seeded with [`sample_world`]
pub async fn memory_service() -> ModerationService {
    ModerationService::from_world(ModerationConfig::default(), &sample_world())
        .await
        .unwrap()
}

/// Handles to the flaky collaborators behind a service
pub struct FlakyHarness {
    pub scopes: Arc<FlakyScopeStore>,
    pub graph: Arc<FlakyEntityGraph>,
    pub service: ModerationService,
}

/// Service over [`sample_world`] whose scope store and graph can be told to fail
pub fn flaky_service() -> FlakyHarness {
    let world = sample_world();
    let scopes = Arc::new(FlakyScopeStore::new());
    let graph = Arc::new(FlakyEntityGraph::new(world.build_graph().unwrap()));
    let service = ModerationService::new(
        ModerationConfig::default(),
        scopes.clone(),
        graph.clone(),
        Arc::new(world.build_directory()),
    );
    FlakyHarness {
        scopes,
        graph,
        service,
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Faults {
    reads: bool,
    writes: bool,
}

/// Scope store that fails on demand
///
/// A failed write never reaches the inner store, the way a rolled-back
/// transaction leaves the previous row.
#[derive(Debug, Default)]
pub struct FlakyScopeStore {
    inner: MemoryScopeStore,
    faults: Mutex<Faults>,
}

impl FlakyScopeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.faults.lock().reads = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.faults.lock().writes = fail;
    }

    pub fn inner(&self) -> &MemoryScopeStore {
        &self.inner
    }

    fn check_read(&self) -> Result<(), StoreError> {
        if self.faults.lock().reads {
            return Err(StoreError::unavailable("injected read failure"));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), StoreError> {
        if self.faults.lock().writes {
            return Err(StoreError::Aborted("injected write failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ScopeStore for FlakyScopeStore {
    async fn get(&self, moderator: &UserId) -> Result<Option<ScopeRecord>, StoreError> {
        self.check_read()?;
        self.inner.get(moderator).await
    }

    async fn replace(
        &self,
        moderator: &UserId,
        scope: Scope,
        acting_admin: Option<UserId>,
    ) -> Result<ScopeRecord, StoreError> {
        self.check_write()?;
        self.inner.replace(moderator, scope, acting_admin).await
    }

    async fn remove(&self, moderator: &UserId) -> Result<bool, StoreError> {
        self.check_write()?;
        self.inner.remove(moderator).await
    }

    async fn list(&self) -> Result<Vec<ScopeRecord>, StoreError> {
        self.check_read()?;
        self.inner.list().await
    }
}

/// Entity graph whose reads fail on demand
#[derive(Debug)]
pub struct FlakyEntityGraph {
    inner: MemoryEntityGraph,
    failing: Mutex<bool>,
}

impl FlakyEntityGraph {
    pub fn new(inner: MemoryEntityGraph) -> Self {
        Self {
            inner,
            failing: Mutex::new(false),
        }
    }

    pub fn fail(&self, fail: bool) {
        *self.failing.lock() = fail;
    }

    pub fn inner(&self) -> &MemoryEntityGraph {
        &self.inner
    }

    fn check(&self) -> Result<(), StoreError> {
        if *self.failing.lock() {
            return Err(StoreError::unavailable("injected graph failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl EntityGraph for FlakyEntityGraph {
    async fn get_by_id(&self, id: &EntityId) -> Result<Option<Entity>, StoreError> {
        self.check()?;
        self.inner.get_by_id(id).await
    }

    async fn get_direct_child(
        &self,
        parent: &EntityId,
        child: &EntityId,
    ) -> Result<Option<Relationship>, StoreError> {
        self.check()?;
        self.inner.get_direct_child(parent, child).await
    }
}
