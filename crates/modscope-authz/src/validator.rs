//! Scope payload validation
//!
//! Turns an admin's [`ScopePayload`] into a typed [`Scope`]. Pure apart
//! from one entity-existence read for entity scopes. City names are
//! trimmed here so the stored value is canonical; the engine never
//! normalizes at decision time.

use crate::deadline::LookupDeadline;
use crate::error::ValidatorError;
use modscope_store::EntityGraph;
use modscope_types::{
    EntityId, RegionCatalog, Scope, ScopeKind, ScopePayload, ValidationError,
};
use std::fmt;
use std::sync::Arc;

/// Longest accepted city name, in characters after trimming
pub const DEFAULT_MAX_CITY_LEN: usize = 100;

/// Validator for proposed scopes
#[derive(Clone)]
pub struct ScopeValidator {
    regions: RegionCatalog,
    max_city_len: usize,
    graph: Arc<dyn EntityGraph>,
    deadline: LookupDeadline,
}

impl ScopeValidator {
    /// Create validator over the default region catalog
    #[must_use]
    pub fn new(graph: Arc<dyn EntityGraph>) -> Self {
        Self {
            regions: RegionCatalog::default(),
            max_city_len: DEFAULT_MAX_CITY_LEN,
            graph,
            deadline: LookupDeadline::none(),
        }
    }

    /// With region catalog
    #[inline]
    #[must_use]
    pub fn with_regions(mut self, regions: RegionCatalog) -> Self {
        self.regions = regions;
        self
    }

    /// With maximum city length
    #[inline]
    #[must_use]
    pub fn with_max_city_len(mut self, max_city_len: usize) -> Self {
        self.max_city_len = max_city_len;
        self
    }

    /// With lookup deadline
    #[inline]
    #[must_use]
    pub fn with_deadline(mut self, deadline: LookupDeadline) -> Self {
        self.deadline = deadline;
        self
    }

    /// Region catalog in use
    #[inline]
    #[must_use]
    pub fn regions(&self) -> &RegionCatalog {
        &self.regions
    }

    /// Validate a payload
    ///
    /// Selector fields the kind does not use are ignored, so an `all`
    /// payload carrying a stray state still yields `Scope::All`.
    ///
    /// # Errors
    /// - `ValidatorError::Invalid` when the payload is rejected
    /// - `ValidatorError::Lookup` when entity existence cannot be checked
    pub async fn validate(&self, payload: &ScopePayload) -> Result<Scope, ValidatorError> {
        let kind = payload.kind()?;

        let scope = match kind {
            ScopeKind::All => Scope::All,
            ScopeKind::State => Scope::State {
                state: self.check_state(payload.state.as_deref(), kind)?,
            },
            ScopeKind::City => {
                let city = payload
                    .city
                    .as_deref()
                    .ok_or(ValidationError::missing("city", kind))?;
                let state = self.check_state(payload.state.as_deref(), kind)?;
                Scope::City {
                    state,
                    city: self.check_city(city)?,
                }
            }
            ScopeKind::Entity => Scope::Entity {
                entity_id: self.check_entity(payload.entity_id.as_deref()).await?,
            },
        };

        Ok(scope)
    }

    fn check_state(&self, state: Option<&str>, kind: ScopeKind) -> Result<String, ValidationError> {
        let state = state.ok_or(ValidationError::missing("state", kind))?;
        if state.is_empty() || !self.regions.contains(state) {
            return Err(ValidationError::InvalidState(state.to_string()));
        }
        Ok(state.to_string())
    }

    fn check_city(&self, city: &str) -> Result<String, ValidationError> {
        let trimmed = city.trim();
        let len = trimmed.chars().count();
        if len == 0 || len > self.max_city_len {
            return Err(ValidationError::InvalidCity {
                city: city.to_string(),
                max_len: self.max_city_len,
            });
        }
        Ok(trimmed.to_string())
    }

    async fn check_entity(&self, entity_id: Option<&str>) -> Result<EntityId, ValidatorError> {
        let id = match entity_id {
            Some(id) if !id.is_empty() => EntityId::new(id),
            _ => return Err(ValidationError::missing("entity_id", ScopeKind::Entity).into()),
        };

        let entity = self
            .deadline
            .run("entity lookup", self.graph.get_by_id(&id))
            .await?;

        match entity {
            Some(_) => Ok(id),
            None => Err(ValidationError::EntityNotFound(id).into()),
        }
    }
}

impl fmt::Debug for ScopeValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeValidator")
            .field("regions", &self.regions.len())
            .field("max_city_len", &self.max_city_len)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}
