//! Moderation service
//!
//! The administrative surface over the scope store:
//! - Validates and assigns scopes
//! - Promotes and demotes users
//! - Describes scopes for the admin UI
//! - Answers `can_moderate` for edit gates

use crate::config::ModerationConfig;
use crate::error::{ModerationError, SetupError};
use crate::types::{Caller, ScopeInfo, ScopeSummary};
use modscope_authz::{
    AuthorizationEngine, Decision, LookupDeadline, ScopeDescriber, ScopeValidator,
};
use modscope_store::{EntityGraph, MemoryScopeStore, ScopeStore, UserDirectory, World};
use modscope_types::{EntityId, Role, Scope, ScopePayload, ScopeRecord, UserId};
use std::fmt;
use std::sync::Arc;

/// Scope administration and authorization
#[derive(Clone)]
pub struct ModerationService {
    /// Configuration
    config: ModerationConfig,
    /// Scope rows
    scopes: Arc<dyn ScopeStore>,
    /// User roles
    users: Arc<dyn UserDirectory>,
    /// Payload validator
    validator: ScopeValidator,
    /// Decision engine
    engine: AuthorizationEngine,
    /// Label renderer
    describer: ScopeDescriber,
}

impl ModerationService {
    /// Create service over the given collaborators
    #[must_use]
    pub fn new(
        config: ModerationConfig,
        scopes: Arc<dyn ScopeStore>,
        graph: Arc<dyn EntityGraph>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        let deadline = config.lookup_deadline();
        Self {
            validator: ScopeValidator::new(graph.clone())
                .with_regions(config.regions.clone())
                .with_max_city_len(config.max_city_len)
                .with_deadline(deadline),
            engine: AuthorizationEngine::new(scopes.clone(), graph.clone())
                .with_deadline(deadline),
            describer: ScopeDescriber::new(scopes.clone(), graph).with_deadline(deadline),
            config,
            scopes,
            users,
        }
    }

    /// Create service over in-memory stores seeded from a fixture
    ///
    /// Seeded scopes go through the same validation as admin requests.
    ///
    /// # Errors
    /// - `SetupError::World` for an inconsistent fixture
    /// - `SetupError::Scope` for the first seeded scope that fails
    pub async fn from_world(config: ModerationConfig, world: &World) -> Result<Self, SetupError> {
        let graph = Arc::new(world.build_graph()?);
        let users = Arc::new(world.build_directory());
        let service = Self::new(config, Arc::new(MemoryScopeStore::new()), graph, users);

        for seed in &world.scopes {
            service
                .apply_scope(&seed.moderator_id, &seed.payload, None)
                .await
                .map_err(|source| SetupError::Scope {
                    moderator: seed.moderator_id.clone(),
                    source,
                })?;
        }

        tracing::info!(
            entities = world.entities.len(),
            users = world.users.len(),
            scopes = world.scopes.len(),
            "service seeded from world"
        );
        Ok(service)
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ModerationConfig {
        &self.config
    }

    /// Validate and store a moderator's scope, replacing any previous one
    ///
    /// Does not touch the user's role.
    ///
    /// # Errors
    /// - `Unauthorized` for non-admin callers
    /// - `UserNotFound` when the directory has no such user
    /// - `Validation` when the payload is rejected
    /// - `Lookup` / `Persistence` on store failure; the previous scope is kept
    pub async fn assign_scope(
        &self,
        caller: &Caller,
        moderator: &UserId,
        payload: &ScopePayload,
    ) -> Result<ScopeRecord, ModerationError> {
        caller.require_admin()?;
        self.apply_scope(moderator, payload, Some(caller.user_id.clone()))
            .await
    }

    /// Same as [`assign_scope`](Self::assign_scope)
    ///
    /// # Errors
    /// See [`assign_scope`](Self::assign_scope)
    pub async fn update_scope(
        &self,
        caller: &Caller,
        moderator: &UserId,
        payload: &ScopePayload,
    ) -> Result<ScopeRecord, ModerationError> {
        self.assign_scope(caller, moderator, payload).await
    }

    /// Promote a plain user to moderator and assign a scope
    ///
    /// The payload is validated before the role changes, so a rejected
    /// payload leaves the user untouched. Admins keep their role.
    ///
    /// # Errors
    /// - `Unauthorized` for non-admin callers
    /// - `Validation` when the payload is rejected
    /// - `UserNotFound` when the directory has no such user
    /// - `Lookup` / `Persistence` on store failure
    pub async fn promote_with_scope(
        &self,
        caller: &Caller,
        user: &UserId,
        payload: &ScopePayload,
    ) -> Result<ScopeRecord, ModerationError> {
        caller.require_admin()?;
        let scope = self.validator.validate(payload).await?;

        let role = self.role_of(user).await?;
        if role == Role::User {
            self.users
                .set_role(user, Role::Moderator)
                .await
                .map_err(|err| {
                    tracing::error!(user = %user, error = %err, "promotion failed");
                    ModerationError::Persistence(err)
                })?;
            tracing::info!(user = %user, by = %caller.user_id, "user promoted to moderator");
        }

        self.store_scope(user, scope, Some(caller.user_id.clone()))
            .await
    }

    /// Delete a moderator's scope; returns whether one existed
    ///
    /// # Errors
    /// - `Unauthorized` for non-admin callers
    /// - `Persistence` on store failure
    pub async fn remove_scope(
        &self,
        caller: &Caller,
        moderator: &UserId,
    ) -> Result<bool, ModerationError> {
        caller.require_admin()?;
        let removed = self.scopes.remove(moderator).await.map_err(|err| {
            tracing::error!(moderator = %moderator, error = %err, "scope removal failed");
            ModerationError::Persistence(err)
        })?;

        tracing::info!(
            moderator = %moderator,
            by = %caller.user_id,
            removed,
            "scope removed"
        );
        Ok(removed)
    }

    /// A moderator's scope row and its label
    ///
    /// # Errors
    /// - `Unauthorized` for non-admin callers
    /// - `Lookup` when the scope row cannot be read
    pub async fn get_scope_info(
        &self,
        caller: &Caller,
        moderator: &UserId,
    ) -> Result<ScopeInfo, ModerationError> {
        caller.require_admin()?;
        let record = self
            .deadline()
            .run("scope lookup", self.scopes.get(moderator))
            .await
            .map_err(ModerationError::Lookup)?;

        let Some(record) = record else {
            return Ok(ScopeInfo::default());
        };

        let description = self.describer.describe_record(&record).await;
        Ok(ScopeInfo {
            scope: Some(record),
            description: Some(description),
        })
    }

    /// Set a user's role; returns the previous role
    ///
    /// Demotion to `user` also deletes the scope row.
    ///
    /// # Errors
    /// - `Unauthorized` for non-admin callers
    /// - `UserNotFound` when the directory has no such user
    /// - `Persistence` on store failure
    pub async fn change_user_role(
        &self,
        caller: &Caller,
        user: &UserId,
        role: Role,
    ) -> Result<Role, ModerationError> {
        caller.require_admin()?;

        // On demotion the scope goes first: a failed role write then leaves
        // a moderator without a scope rather than a user holding one.
        if role == Role::User {
            self.role_of(user).await?;
            let removed = self.scopes.remove(user).await.map_err(|err| {
                tracing::error!(user = %user, error = %err, "scope removal before demotion failed");
                ModerationError::Persistence(err)
            })?;
            if removed {
                tracing::info!(user = %user, "scope removed on demotion");
            }
        }

        let previous = self
            .users
            .set_role(user, role)
            .await
            .map_err(|err| {
                tracing::error!(user = %user, error = %err, "role change failed");
                ModerationError::Persistence(err)
            })?
            .ok_or_else(|| ModerationError::UserNotFound(user.clone()))?;

        tracing::info!(
            user = %user,
            from = %previous,
            to = %role,
            by = %caller.user_id,
            "user role changed"
        );

        Ok(previous)
    }

    /// Every scoped moderator with its short label, ordered by moderator id
    ///
    /// # Errors
    /// - `Unauthorized` for non-admin callers
    /// - `Lookup` when the scope rows cannot be read
    pub async fn scope_directory(
        &self,
        caller: &Caller,
    ) -> Result<Vec<ScopeSummary>, ModerationError> {
        caller.require_admin()?;
        let records = self
            .deadline()
            .run("scope listing", self.scopes.list())
            .await
            .map_err(ModerationError::Lookup)?;

        let mut summaries = Vec::with_capacity(records.len());
        for record in records {
            summaries.push(ScopeSummary {
                description: self.describer.summarize_record(&record).await,
                scope_type: record.scope.kind(),
                moderator_id: record.moderator_id,
            });
        }
        Ok(summaries)
    }

    /// Whether a moderator may edit an entity; any failure denies
    pub async fn can_moderate(&self, moderator: &UserId, entity: &EntityId) -> bool {
        self.engine.can_moderate(moderator, entity).await
    }

    /// Decision with its reason
    pub async fn explain(&self, moderator: &UserId, entity: &EntityId) -> Decision {
        self.engine.explain(moderator, entity).await
    }

    async fn apply_scope(
        &self,
        moderator: &UserId,
        payload: &ScopePayload,
        acting_admin: Option<UserId>,
    ) -> Result<ScopeRecord, ModerationError> {
        self.role_of(moderator).await?;
        let scope = self.validator.validate(payload).await.map_err(|err| {
            tracing::debug!(moderator = %moderator, error = %err, "scope payload rejected");
            ModerationError::from(err)
        })?;
        self.store_scope(moderator, scope, acting_admin).await
    }

    async fn store_scope(
        &self,
        moderator: &UserId,
        scope: Scope,
        acting_admin: Option<UserId>,
    ) -> Result<ScopeRecord, ModerationError> {
        let record = self
            .scopes
            .replace(moderator, scope, acting_admin)
            .await
            .map_err(|err| {
                tracing::error!(moderator = %moderator, error = %err, "scope assignment failed");
                ModerationError::Persistence(err)
            })?;

        tracing::info!(
            moderator = %moderator,
            scope_type = %record.scope.kind(),
            by = record.updated_by.as_ref().map_or("seed", UserId::as_str),
            "scope assigned"
        );
        Ok(record)
    }

    async fn role_of(&self, user: &UserId) -> Result<Role, ModerationError> {
        self.deadline()
            .run("role lookup", self.users.role_of(user))
            .await
            .map_err(ModerationError::Lookup)?
            .ok_or_else(|| ModerationError::UserNotFound(user.clone()))
    }

    #[inline]
    fn deadline(&self) -> LookupDeadline {
        self.config.lookup_deadline()
    }
}

impl fmt::Debug for ModerationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModerationService")
            .field("config", &self.config)
            .field("validator", &self.validator)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modscope_store::{MemoryEntityGraph, MemoryUserDirectory};
    use modscope_types::{Entity, EntityType, ScopeKind};
    use pretty_assertions::assert_eq;

    struct Fixture {
        scopes: Arc<MemoryScopeStore>,
        users: Arc<MemoryUserDirectory>,
        service: ModerationService,
    }

    fn fixture() -> Fixture {
        let scopes = Arc::new(MemoryScopeStore::new());
        let graph = Arc::new(MemoryEntityGraph::new());
        graph.insert_entity(
            Entity::new("a", "Gateway Trust", EntityType::Organization)
                .located("Maharashtra", "Mumbai"),
        );
        let users = Arc::new(MemoryUserDirectory::new());
        users.insert(UserId::new("admin-1"), Role::Admin);
        users.insert(UserId::new("mod-0"), Role::Moderator);
        users.insert(UserId::new("mod-1"), Role::Moderator);
        users.insert(UserId::new("user-1"), Role::User);

        let service = ModerationService::new(
            ModerationConfig::default(),
            scopes.clone(),
            graph,
            users.clone(),
        );
        Fixture {
            scopes,
            users,
            service,
        }
    }

    fn admin() -> Caller {
        Caller::admin("admin-1")
    }

    #[tokio::test]
    async fn assign_then_reassign_keeps_one_row() {
        let f = fixture();
        let m = UserId::new("mod-1");

        let first = f
            .service
            .assign_scope(&admin(), &m, &ScopePayload::city("Maharashtra", "Mumbai"))
            .await
            .unwrap();
        assert_eq!(first.created_by, Some(UserId::new("admin-1")));

        f.service
            .update_scope(&admin(), &m, &ScopePayload::state("Kerala"))
            .await
            .unwrap();

        assert_eq!(f.scopes.len(), 1);
        let info = f.service.get_scope_info(&admin(), &m).await.unwrap();
        let record = info.scope.unwrap();
        assert_eq!(
            record.scope,
            Scope::State {
                state: "Kerala".into()
            }
        );
        assert_eq!(record.scope.city(), None);
        assert_eq!(info.description.as_deref(), Some("State: Kerala"));
    }

    #[tokio::test]
    async fn assign_to_unknown_user_is_rejected() {
        let f = fixture();
        let ghost = UserId::new("ghost");
        for payload in [ScopePayload::all(), ScopePayload::state("Atlantis")] {
            let err = f
                .service
                .assign_scope(&admin(), &ghost, &payload)
                .await
                .unwrap_err();
            assert_eq!(err, ModerationError::UserNotFound(ghost.clone()));
        }
        let err = f
            .service
            .update_scope(&admin(), &ghost, &ScopePayload::all())
            .await
            .unwrap_err();
        assert_eq!(err, ModerationError::UserNotFound(ghost.clone()));

        assert!(f.scopes.is_empty());
        assert!(!f.service.can_moderate(&ghost, &EntityId::new("a")).await);
    }

    #[tokio::test]
    async fn failed_demotion_write_leaves_no_scope() {
        use modscope_store::{MockUserDirectory, StoreError};

        let mut users = MockUserDirectory::new();
        users
            .expect_role_of()
            .returning(|_| Ok(Some(Role::Moderator)));
        users
            .expect_set_role()
            .returning(|_, _| Err(StoreError::unavailable("primary down")));

        let scopes = Arc::new(MemoryScopeStore::new());
        let graph = Arc::new(MemoryEntityGraph::new());
        graph.insert_entity(Entity::new("a", "Gateway Trust", EntityType::Organization));
        let m = UserId::new("mod-1");
        scopes.replace(&m, Scope::All, None).await.unwrap();

        let service = ModerationService::new(
            ModerationConfig::default(),
            scopes.clone(),
            graph,
            Arc::new(users),
        );

        let err = service
            .change_user_role(&admin(), &m, Role::User)
            .await
            .unwrap_err();
        assert!(matches!(err, ModerationError::Persistence(_)));
        assert!(scopes.is_empty());
        assert!(!service.can_moderate(&m, &EntityId::new("a")).await);
    }

    #[tokio::test]
    async fn rejected_payload_keeps_previous_scope() {
        let f = fixture();
        let m = UserId::new("mod-1");
        f.service
            .assign_scope(&admin(), &m, &ScopePayload::all())
            .await
            .unwrap();

        let err = f
            .service
            .assign_scope(&admin(), &m, &ScopePayload::state("Atlantis"))
            .await
            .unwrap_err();
        assert!(matches!(err, ModerationError::Validation(_)));

        let info = f.service.get_scope_info(&admin(), &m).await.unwrap();
        assert_eq!(info.scope.map(|r| r.scope), Some(Scope::All));
    }

    #[tokio::test]
    async fn promote_with_scope_promotes_plain_users_only() {
        let f = fixture();
        let user = UserId::new("user-1");
        f.service
            .promote_with_scope(&admin(), &user, &ScopePayload::entity("a"))
            .await
            .unwrap();
        assert_eq!(f.users.role_of(&user).await.unwrap(), Some(Role::Moderator));
        assert!(f.service.can_moderate(&user, &EntityId::new("a")).await);

        let admin_id = UserId::new("admin-1");
        f.service
            .promote_with_scope(&admin(), &admin_id, &ScopePayload::all())
            .await
            .unwrap();
        assert_eq!(f.users.role_of(&admin_id).await.unwrap(), Some(Role::Admin));
    }

    #[tokio::test]
    async fn promote_validates_before_promoting() {
        let f = fixture();
        let user = UserId::new("user-1");
        let err = f
            .service
            .promote_with_scope(&admin(), &user, &ScopePayload::entity("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, ModerationError::Validation(_)));
        assert_eq!(f.users.role_of(&user).await.unwrap(), Some(Role::User));
    }

    #[tokio::test]
    async fn promote_unknown_user() {
        let f = fixture();
        let err = f
            .service
            .promote_with_scope(&admin(), &UserId::new("ghost"), &ScopePayload::all())
            .await
            .unwrap_err();
        assert_eq!(err, ModerationError::UserNotFound(UserId::new("ghost")));
        assert!(f.scopes.is_empty());
    }

    #[tokio::test]
    async fn failed_promotion_assigns_nothing() {
        use modscope_store::{MockUserDirectory, StoreError};
        use mockall::predicate::eq;

        let mut users = MockUserDirectory::new();
        users
            .expect_role_of()
            .with(eq(UserId::new("user-1")))
            .returning(|_| Ok(Some(Role::User)));
        users
            .expect_set_role()
            .returning(|_, _| Err(StoreError::Aborted("deadlock".into())));

        let scopes = Arc::new(MemoryScopeStore::new());
        let service = ModerationService::new(
            ModerationConfig::default(),
            scopes.clone(),
            Arc::new(MemoryEntityGraph::new()),
            Arc::new(users),
        );

        let err = service
            .promote_with_scope(&admin(), &UserId::new("user-1"), &ScopePayload::all())
            .await
            .unwrap_err();
        assert!(matches!(err, ModerationError::Persistence(_)));
        assert!(scopes.is_empty());
    }

    #[tokio::test]
    async fn demotion_removes_scope() {
        let f = fixture();
        let m = UserId::new("mod-1");
        f.service
            .assign_scope(&admin(), &m, &ScopePayload::all())
            .await
            .unwrap();

        let previous = f
            .service
            .change_user_role(&admin(), &m, Role::User)
            .await
            .unwrap();
        assert_eq!(previous, Role::Moderator);
        assert!(f.scopes.is_empty());
        assert!(!f.service.can_moderate(&m, &EntityId::new("a")).await);
    }

    #[tokio::test]
    async fn promotion_to_admin_keeps_scope() {
        let f = fixture();
        let m = UserId::new("mod-1");
        f.service
            .assign_scope(&admin(), &m, &ScopePayload::all())
            .await
            .unwrap();
        f.service
            .change_user_role(&admin(), &m, Role::Admin)
            .await
            .unwrap();
        assert_eq!(f.scopes.len(), 1);
    }

    #[tokio::test]
    async fn change_role_of_unknown_user() {
        let f = fixture();
        let err = f
            .service
            .change_user_role(&admin(), &UserId::new("ghost"), Role::Moderator)
            .await
            .unwrap_err();
        assert!(matches!(err, ModerationError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn remove_scope_reports_existence() {
        let f = fixture();
        let m = UserId::new("mod-1");
        assert!(!f.service.remove_scope(&admin(), &m).await.unwrap());
        f.service
            .assign_scope(&admin(), &m, &ScopePayload::all())
            .await
            .unwrap();
        assert!(f.service.remove_scope(&admin(), &m).await.unwrap());
        assert_eq!(
            f.service.get_scope_info(&admin(), &m).await.unwrap(),
            ScopeInfo::default()
        );
    }

    #[tokio::test]
    async fn directory_lists_every_scope() {
        let f = fixture();
        f.service
            .assign_scope(&admin(), &UserId::new("mod-1"), &ScopePayload::entity("a"))
            .await
            .unwrap();
        f.service
            .assign_scope(&admin(), &UserId::new("mod-0"), &ScopePayload::all())
            .await
            .unwrap();

        let directory = f.service.scope_directory(&admin()).await.unwrap();
        assert_eq!(
            directory,
            vec![
                ScopeSummary {
                    moderator_id: UserId::new("mod-0"),
                    scope_type: ScopeKind::All,
                    description: "All entities".into(),
                },
                ScopeSummary {
                    moderator_id: UserId::new("mod-1"),
                    scope_type: ScopeKind::Entity,
                    description: "Entity: Gateway Trust".into(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn non_admins_are_rejected_everywhere() {
        let f = fixture();
        let m = UserId::new("mod-1");
        let payload = ScopePayload::all();

        for caller in [
            Caller::new("mod-1", Role::Moderator),
            Caller::new("user-1", Role::User),
        ] {
            let unauthorized = |err: ModerationError| {
                assert!(matches!(err, ModerationError::Unauthorized { .. }), "{err}");
            };
            unauthorized(f.service.assign_scope(&caller, &m, &payload).await.unwrap_err());
            unauthorized(f.service.update_scope(&caller, &m, &payload).await.unwrap_err());
            unauthorized(
                f.service
                    .promote_with_scope(&caller, &m, &payload)
                    .await
                    .unwrap_err(),
            );
            unauthorized(f.service.remove_scope(&caller, &m).await.unwrap_err());
            unauthorized(f.service.get_scope_info(&caller, &m).await.unwrap_err());
            unauthorized(
                f.service
                    .change_user_role(&caller, &m, Role::Admin)
                    .await
                    .unwrap_err(),
            );
            unauthorized(f.service.scope_directory(&caller).await.unwrap_err());
        }

        assert!(f.scopes.is_empty());
        assert_eq!(f.users.role_of(&m).await.unwrap(), Some(Role::Moderator));
    }
}
