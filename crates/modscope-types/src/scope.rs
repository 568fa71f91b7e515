//! Moderator scope model
//!
//! A [`Scope`] carries exactly the selector fields its kind needs, so a
//! state scope with a stray entity id cannot be constructed. The loosely
//! typed [`ScopePayload`] is what admins submit; it only becomes a `Scope`
//! after validation.

use crate::error::ValidationError;
use crate::ids::{EntityId, ScopeRecordId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag of a scope variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    /// Every entity
    All,
    /// Entities located in one region
    State,
    /// Entities located in one city of one region
    City,
    /// One entity and its direct children
    Entity,
}

impl ScopeKind {
    /// All kinds, in declaration order
    pub const ALL: [ScopeKind; 4] = [Self::All, Self::State, Self::City, Self::Entity];

    /// Wire tag of this kind
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::State => "state",
            Self::City => "city",
            Self::Entity => "entity",
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopeKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "state" => Ok(Self::State),
            "city" => Ok(Self::City),
            "entity" => Ok(Self::Entity),
            other => Err(ValidationError::InvalidScopeType(other.to_string())),
        }
    }
}

/// Validated moderator scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope_type", rename_all = "lowercase")]
pub enum Scope {
    /// Global authority
    All,
    /// Region-wide authority
    State {
        /// Region name, exactly as stored on entities
        state: String,
    },
    /// City-wide authority; both fields must match the target
    City {
        /// Region name
        state: String,
        /// City name
        city: String,
    },
    /// Authority over one entity and its direct children
    Entity {
        /// Weak reference to the scoped entity
        entity_id: EntityId,
    },
}

impl Scope {
    /// Kind tag of this scope
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ScopeKind {
        match self {
            Self::All => ScopeKind::All,
            Self::State { .. } => ScopeKind::State,
            Self::City { .. } => ScopeKind::City,
            Self::Entity { .. } => ScopeKind::Entity,
        }
    }

    /// Region selector, present for state and city scopes
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        match self {
            Self::State { state } | Self::City { state, .. } => Some(state),
            Self::All | Self::Entity { .. } => None,
        }
    }

    /// City selector, present for city scopes
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        match self {
            Self::City { city, .. } => Some(city),
            Self::All | Self::State { .. } | Self::Entity { .. } => None,
        }
    }

    /// Entity selector, present for entity scopes
    #[must_use]
    pub fn entity_id(&self) -> Option<&EntityId> {
        match self {
            Self::Entity { entity_id } => Some(entity_id),
            Self::All | Self::State { .. } | Self::City { .. } => None,
        }
    }

    /// Flat column projection of this scope
    #[must_use]
    pub fn selectors(&self) -> ScopeSelectors {
        ScopeSelectors {
            scope_type: self.kind(),
            state: self.state().map(str::to_string),
            city: self.city().map(str::to_string),
            entity_id: self.entity_id().cloned(),
        }
    }
}

/// Flat projection of a scope as four nullable columns
///
/// Always has exactly the selector set of `scope_type` populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeSelectors {
    /// Kind tag
    pub scope_type: ScopeKind,
    /// Region column
    pub state: Option<String>,
    /// City column
    pub city: Option<String>,
    /// Entity column
    pub entity_id: Option<EntityId>,
}

/// Unvalidated scope request
///
/// Mirrors the admin form: a free-form type tag plus optional selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopePayload {
    /// Requested kind tag
    pub scope_type: String,
    /// Requested region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Requested city
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Requested entity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
}

impl ScopePayload {
    /// Payload with only a type tag
    #[inline]
    #[must_use]
    pub fn new(scope_type: impl Into<String>) -> Self {
        Self {
            scope_type: scope_type.into(),
            ..Self::default()
        }
    }

    /// Global scope request
    #[inline]
    #[must_use]
    pub fn all() -> Self {
        Self::new(ScopeKind::All.as_str())
    }

    /// Region scope request
    #[inline]
    #[must_use]
    pub fn state(state: impl Into<String>) -> Self {
        Self::new(ScopeKind::State.as_str()).with_state(state)
    }

    /// City scope request
    #[inline]
    #[must_use]
    pub fn city(state: impl Into<String>, city: impl Into<String>) -> Self {
        Self::new(ScopeKind::City.as_str())
            .with_state(state)
            .with_city(city)
    }

    /// Entity scope request
    #[inline]
    #[must_use]
    pub fn entity(entity_id: impl Into<String>) -> Self {
        Self::new(ScopeKind::Entity.as_str()).with_entity(entity_id)
    }

    /// With region selector
    #[inline]
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// With city selector
    #[inline]
    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// With entity selector
    #[inline]
    #[must_use]
    pub fn with_entity(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Parse the type tag
    ///
    /// # Errors
    /// `ValidationError::InvalidScopeType` for an unknown tag
    pub fn kind(&self) -> Result<ScopeKind, ValidationError> {
        self.scope_type.parse()
    }
}

impl From<&Scope> for ScopePayload {
    fn from(scope: &Scope) -> Self {
        let selectors = scope.selectors();
        Self {
            scope_type: selectors.scope_type.as_str().to_string(),
            state: selectors.state,
            city: selectors.city,
            entity_id: selectors.entity_id.map(|id| id.as_str().to_string()),
        }
    }
}

/// Persisted scope row, one per moderator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeRecord {
    /// Row id, fresh on every replace
    pub id: ScopeRecordId,
    /// Holder of the scope
    pub moderator_id: UserId,
    /// The scope itself
    #[serde(flatten)]
    pub scope: Scope,
    /// Creation time of this row
    pub created_at: DateTime<Utc>,
    /// Last update time of this row
    pub updated_at: DateTime<Utc>,
    /// Admin who created the row
    pub created_by: Option<UserId>,
    /// Admin who last updated the row
    pub updated_by: Option<UserId>,
}

impl ScopeRecord {
    /// Build a fresh row stamped with the current time
    #[must_use]
    pub fn new(moderator_id: UserId, scope: Scope, acting_admin: Option<UserId>) -> Self {
        let now = Utc::now();
        Self {
            id: ScopeRecordId::new(),
            moderator_id,
            scope,
            created_at: now,
            updated_at: now,
            created_by: acting_admin.clone(),
            updated_by: acting_admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn kind_round_trips_through_tag() {
        for kind in ScopeKind::ALL {
            assert_eq!(kind.as_str().parse::<ScopeKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = "region".parse::<ScopeKind>().unwrap_err();
        assert_eq!(err, ValidationError::InvalidScopeType("region".to_string()));

        // Tags are case-sensitive
        assert!("State".parse::<ScopeKind>().is_err());
    }

    #[test]
    fn selectors_match_kind() {
        let city = Scope::City {
            state: "Maharashtra".into(),
            city: "Mumbai".into(),
        };
        let sel = city.selectors();
        assert_eq!(sel.scope_type, ScopeKind::City);
        assert_eq!(sel.state.as_deref(), Some("Maharashtra"));
        assert_eq!(sel.city.as_deref(), Some("Mumbai"));
        assert!(sel.entity_id.is_none());

        let entity = Scope::Entity {
            entity_id: EntityId::new("org-1"),
        };
        let sel = entity.selectors();
        assert!(sel.state.is_none());
        assert!(sel.city.is_none());
        assert_eq!(sel.entity_id, Some(EntityId::new("org-1")));

        let sel = Scope::All.selectors();
        assert!(sel.state.is_none() && sel.city.is_none() && sel.entity_id.is_none());
    }

    #[test]
    fn record_serializes_flat_columns() {
        let record = ScopeRecord::new(
            UserId::new("mod-1"),
            Scope::State {
                state: "Kerala".into(),
            },
            Some(UserId::new("admin-1")),
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["scope_type"], "state");
        assert_eq!(value["state"], "Kerala");
        assert!(value.get("city").is_none());
        assert_eq!(value["created_by"], "admin-1");

        let back: ScopeRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn payload_builders_set_requested_selectors() {
        let payload = ScopePayload::city("Maharashtra", "Mumbai");
        assert_eq!(payload.kind().unwrap(), ScopeKind::City);
        assert_eq!(payload.state.as_deref(), Some("Maharashtra"));
        assert_eq!(payload.city.as_deref(), Some("Mumbai"));
        assert!(payload.entity_id.is_none());
    }

    fn arb_scope() -> impl Strategy<Value = Scope> {
        prop_oneof![
            Just(Scope::All),
            "[A-Za-z ]{1,12}".prop_map(|state| Scope::State { state }),
            ("[A-Za-z ]{1,12}", "[A-Za-z ]{1,12}")
                .prop_map(|(state, city)| Scope::City { state, city }),
            "[a-z0-9-]{1,12}".prop_map(|id| Scope::Entity {
                entity_id: EntityId::new(id)
            }),
        ]
    }

    proptest! {
        #[test]
        fn prop_exactly_the_kind_selectors_are_populated(scope in arb_scope()) {
            let sel = scope.selectors();
            let populated = (
                sel.state.is_some(),
                sel.city.is_some(),
                sel.entity_id.is_some(),
            );
            let expected = match sel.scope_type {
                ScopeKind::All => (false, false, false),
                ScopeKind::State => (true, false, false),
                ScopeKind::City => (true, true, false),
                ScopeKind::Entity => (false, false, true),
            };
            prop_assert_eq!(populated, expected);
        }
    }
}
