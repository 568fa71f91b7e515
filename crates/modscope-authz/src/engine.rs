//! Authorization engine
//!
//! Decides whether a moderator may edit an entity:
//! - No scope row → deny
//! - `All` → allow without touching the entity graph
//! - Unknown target entity → deny
//! - `Entity` → the scoped entity itself or a *direct* child (one edge)
//! - `State` / `City` → exact, case-sensitive selector match
//!
//! Every call re-reads the scope and the graph. Lookup failures are logged
//! and deny; the public contract is a boolean.

use crate::deadline::LookupDeadline;
use crate::error::DecisionError;
use modscope_store::{EntityGraph, ScopeStore};
use modscope_types::{Entity, EntityId, Scope, UserId};
use std::fmt;
use std::sync::Arc;

/// Why a decision came out the way it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionReason {
    /// Moderator has no scope row
    NoScope,
    /// Scope covers every entity
    GlobalScope,
    /// Target entity does not exist
    EntityNotFound,
    /// Target is the scoped entity
    ScopedEntity,
    /// Target is a direct child of the scoped entity
    DirectChild,
    /// Target is neither the scoped entity nor a direct child
    OutsideEntityScope,
    /// Target lies in the scoped region
    StateMatch,
    /// Target lies outside the scoped region
    StateMismatch,
    /// Target lies in the scoped city
    CityMatch,
    /// Target's city or region differs from the scope
    CityMismatch,
    /// A lookup failed; denied fail-closed
    LookupFailed,
}

impl DecisionReason {
    /// Short machine-friendly label
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoScope => "no_scope",
            Self::GlobalScope => "global_scope",
            Self::EntityNotFound => "entity_not_found",
            Self::ScopedEntity => "scoped_entity",
            Self::DirectChild => "direct_child",
            Self::OutsideEntityScope => "outside_entity_scope",
            Self::StateMatch => "state_match",
            Self::StateMismatch => "state_mismatch",
            Self::CityMatch => "city_match",
            Self::CityMismatch => "city_mismatch",
            Self::LookupFailed => "lookup_failed",
        }
    }
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether the edit is permitted
    pub allowed: bool,
    /// Rule that produced the outcome
    pub reason: DecisionReason,
}

impl Decision {
    /// Permit
    #[inline]
    #[must_use]
    pub fn allow(reason: DecisionReason) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    /// Refuse
    #[inline]
    #[must_use]
    pub fn deny(reason: DecisionReason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }

    fn from_match(matched: bool, hit: DecisionReason, miss: DecisionReason) -> Self {
        if matched {
            Self::allow(hit)
        } else {
            Self::deny(miss)
        }
    }
}

/// Read-only decision maker over the scope store and entity graph
#[derive(Clone)]
pub struct AuthorizationEngine {
    scopes: Arc<dyn ScopeStore>,
    graph: Arc<dyn EntityGraph>,
    deadline: LookupDeadline,
}

impl AuthorizationEngine {
    /// Create engine without lookup deadline
    #[must_use]
    pub fn new(scopes: Arc<dyn ScopeStore>, graph: Arc<dyn EntityGraph>) -> Self {
        Self {
            scopes,
            graph,
            deadline: LookupDeadline::none(),
        }
    }

    /// With lookup deadline
    #[inline]
    #[must_use]
    pub fn with_deadline(mut self, deadline: LookupDeadline) -> Self {
        self.deadline = deadline;
        self
    }

    /// Whether `moderator` may edit `entity`
    ///
    /// Never fails: lookup errors are logged and deny.
    pub async fn can_moderate(&self, moderator: &UserId, entity: &EntityId) -> bool {
        self.explain(moderator, entity).await.allowed
    }

    /// Fail-closed decision with its reason
    pub async fn explain(&self, moderator: &UserId, entity: &EntityId) -> Decision {
        match self.decide(moderator, entity).await {
            Ok(decision) => {
                tracing::debug!(
                    moderator = %moderator,
                    entity = %entity,
                    allowed = decision.allowed,
                    reason = %decision.reason,
                    "authorization decided"
                );
                decision
            }
            Err(err) => {
                tracing::warn!(
                    moderator = %moderator,
                    entity = %entity,
                    error = %err,
                    "authorization lookup failed, denying"
                );
                Decision::deny(DecisionReason::LookupFailed)
            }
        }
    }

    /// Decision that surfaces lookup failures
    ///
    /// # Errors
    /// `DecisionError` when the scope store or entity graph fails
    pub async fn decide(
        &self,
        moderator: &UserId,
        entity: &EntityId,
    ) -> Result<Decision, DecisionError> {
        let record = self
            .deadline
            .run("scope lookup", self.scopes.get(moderator))
            .await
            .map_err(DecisionError::Scope)?;

        match record {
            Some(record) => self.decide_for_scope(&record.scope, entity).await,
            None => Ok(Decision::deny(DecisionReason::NoScope)),
        }
    }

    /// Decision for an already resolved scope
    ///
    /// # Errors
    /// `DecisionError` when the entity graph fails
    pub async fn decide_for_scope(
        &self,
        scope: &Scope,
        entity: &EntityId,
    ) -> Result<Decision, DecisionError> {
        if matches!(scope, Scope::All) {
            return Ok(Decision::allow(DecisionReason::GlobalScope));
        }

        let Some(target) = self.target(entity).await? else {
            return Ok(Decision::deny(DecisionReason::EntityNotFound));
        };

        let decision = match scope {
            Scope::All => Decision::allow(DecisionReason::GlobalScope),
            Scope::Entity { entity_id } => self.entity_decision(entity_id, &target).await?,
            Scope::State { state } => Decision::from_match(
                target.state.as_deref() == Some(state.as_str()),
                DecisionReason::StateMatch,
                DecisionReason::StateMismatch,
            ),
            Scope::City { state, city } => Decision::from_match(
                target.city.as_deref() == Some(city.as_str())
                    && target.state.as_deref() == Some(state.as_str()),
                DecisionReason::CityMatch,
                DecisionReason::CityMismatch,
            ),
        };

        Ok(decision)
    }

    async fn target(&self, entity: &EntityId) -> Result<Option<Entity>, DecisionError> {
        self.deadline
            .run("entity lookup", self.graph.get_by_id(entity))
            .await
            .map_err(DecisionError::Entity)
    }

    /// One hop only: a grandchild needs its own edge from the scoped entity.
    async fn entity_decision(
        &self,
        scoped: &EntityId,
        target: &Entity,
    ) -> Result<Decision, DecisionError> {
        if scoped == &target.id {
            return Ok(Decision::allow(DecisionReason::ScopedEntity));
        }

        let edge = self
            .deadline
            .run(
                "relationship lookup",
                self.graph.get_direct_child(scoped, &target.id),
            )
            .await
            .map_err(DecisionError::Relationship)?;

        Ok(Decision::from_match(
            edge.is_some(),
            DecisionReason::DirectChild,
            DecisionReason::OutsideEntityScope,
        ))
    }
}

impl fmt::Debug for AuthorizationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationEngine")
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}
