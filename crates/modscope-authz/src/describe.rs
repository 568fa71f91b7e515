//! Scope descriptions
//!
//! Entity names are re-read on every call, so renames and deletions show up
//! immediately. A vanished entity renders as [`UNKNOWN_ENTITY_LABEL`].

use crate::deadline::LookupDeadline;
use modscope_store::{EntityGraph, ScopeStore, StoreError};
use modscope_types::{EntityId, Scope, ScopeRecord, UserId};
use std::fmt;
use std::sync::Arc;

/// Label of a global scope
pub const ALL_ENTITIES_LABEL: &str = "All entities";

/// Label of an entity scope whose entity cannot be resolved
pub const UNKNOWN_ENTITY_LABEL: &str = "Entity: Unknown";

/// Renders scopes for administrators
#[derive(Clone)]
pub struct ScopeDescriber {
    scopes: Arc<dyn ScopeStore>,
    graph: Arc<dyn EntityGraph>,
    deadline: LookupDeadline,
}

impl ScopeDescriber {
    /// Create describer
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

    /// Description of a moderator's current scope, `None` without one
    ///
    /// # Errors
    /// `StoreError` when the scope row cannot be read
    pub async fn describe(&self, moderator: &UserId) -> Result<Option<String>, StoreError> {
        let record = self
            .deadline
            .run("scope lookup", self.scopes.get(moderator))
            .await?;

        match record {
            Some(record) => Ok(Some(self.describe_record(&record).await)),
            None => Ok(None),
        }
    }

    /// Description of a scope row already in hand
    pub async fn describe_record(&self, record: &ScopeRecord) -> String {
        self.describe_scope(&record.scope).await
    }

    /// Description of a scope
    pub async fn describe_scope(&self, scope: &Scope) -> String {
        self.label(scope, true).await
    }

    /// Short label for directory listings; entity scopes omit `(+ children)`
    pub async fn summarize_record(&self, record: &ScopeRecord) -> String {
        self.label(&record.scope, false).await
    }

    async fn label(&self, scope: &Scope, with_children: bool) -> String {
        match scope {
            Scope::All => ALL_ENTITIES_LABEL.to_string(),
            Scope::State { state } => format!("State: {state}"),
            Scope::City { state, city } => format!("City: {city}, {state}"),
            Scope::Entity { entity_id } => match self.entity_name(entity_id).await {
                Some(name) if with_children => format!("Entity: {name} (+ children)"),
                Some(name) => format!("Entity: {name}"),
                None => UNKNOWN_ENTITY_LABEL.to_string(),
            },
        }
    }

    async fn entity_name(&self, entity_id: &EntityId) -> Option<String> {
        match self
            .deadline
            .run("entity lookup", self.graph.get_by_id(entity_id))
            .await
        {
            Ok(entity) => entity.map(|e| e.name),
            Err(err) => {
                tracing::warn!(entity = %entity_id, error = %err, "entity name lookup failed");
                None
            }
        }
    }
}

impl fmt::Debug for ScopeDescriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeDescriber")
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}
