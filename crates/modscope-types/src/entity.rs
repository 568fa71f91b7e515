//! Entity graph and user role types
//!
//! Entities and relationships are owned by an external store; this crate
//! only models the fields authorization consumes.

use crate::ids::EntityId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of moderated record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// An individual
    Person,
    /// A company, NGO or agency
    Organization,
    /// A department inside an organization
    Department,
    /// Roads, bridges, buildings and similar records
    Infrastructure,
}

/// Moderated record, as seen by authorization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity id
    pub id: EntityId,
    /// Display name
    pub name: String,
    /// Region the entity belongs to
    #[serde(default)]
    pub state: Option<String>,
    /// City the entity belongs to
    #[serde(default)]
    pub city: Option<String>,
    /// Record kind
    pub entity_type: EntityType,
}

impl Entity {
    /// Create entity without location
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, entity_type: EntityType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            state: None,
            city: None,
            entity_type,
        }
    }

    /// With location
    #[inline]
    #[must_use]
    pub fn located(mut self, state: impl Into<String>, city: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self.city = Some(city.into());
        self
    }

    /// With region only
    #[inline]
    #[must_use]
    pub fn in_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }
}

/// Directed parent→child edge between two entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Parent side
    pub parent_entity_id: EntityId,
    /// Child side
    pub child_entity_id: EntityId,
    /// Free-form label such as `former_head_of`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<String>,
    /// Start of the relationship
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// End of the relationship
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl Relationship {
    /// Create untyped edge
    #[inline]
    #[must_use]
    pub fn new(parent: impl Into<EntityId>, child: impl Into<EntityId>) -> Self {
        Self {
            parent_entity_id: parent.into(),
            child_entity_id: child.into(),
            relationship_type: None,
            start_date: None,
            end_date: None,
        }
    }

    /// With relationship label
    #[inline]
    #[must_use]
    pub fn with_type(mut self, relationship_type: impl Into<String>) -> Self {
        self.relationship_type = Some(relationship_type.into());
        self
    }
}

/// Role of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// No administrative authority
    User,
    /// Scoped authority
    Moderator,
    /// Full authority
    Admin,
}

impl Role {
    /// Wire name of this role
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: '{other}'")),
        }
    }
}
