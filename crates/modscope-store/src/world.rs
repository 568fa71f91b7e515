//! World fixtures
//!
//! A `World` describes entities, edges, users and scope assignments in
//! YAML or JSON. It seeds the in-memory stores for the CLI and for tests;
//! scope assignments are left for the caller to validate and apply.

use crate::error::WorldError;
use crate::memory::{MemoryEntityGraph, MemoryUserDirectory};
use modscope_types::{Entity, EntityId, Relationship, Role, ScopePayload, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// User account in a fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSeed {
    /// User id
    pub id: UserId,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Initial role
    pub role: Role,
}

/// Scope assignment in a fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeSeed {
    /// Moderator receiving the scope
    pub moderator_id: UserId,
    /// Requested scope, validated on apply
    #[serde(flatten)]
    pub payload: ScopePayload,
}

/// Complete fixture
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    /// Entities
    #[serde(default)]
    pub entities: Vec<Entity>,
    /// Parent→child edges
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    /// User accounts
    #[serde(default)]
    pub users: Vec<UserSeed>,
    /// Scope assignments
    #[serde(default)]
    pub scopes: Vec<ScopeSeed>,
}

impl World {
    /// Parse YAML fixture
    ///
    /// # Errors
    /// `WorldError::Yaml` on malformed input
    pub fn from_yaml_str(source: &str) -> Result<Self, WorldError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Parse JSON fixture
    ///
    /// # Errors
    /// `WorldError::Json` on malformed input
    pub fn from_json_str(source: &str) -> Result<Self, WorldError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load a fixture file; `.json` is parsed as JSON, anything else as YAML
    ///
    /// # Errors
    /// IO or parse failures
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorldError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| WorldError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let world = if is_json {
            Self::from_json_str(&source)?
        } else {
            Self::from_yaml_str(&source)?
        };

        tracing::debug!(
            path = %path.display(),
            entities = world.entities.len(),
            relationships = world.relationships.len(),
            users = world.users.len(),
            scopes = world.scopes.len(),
            "world fixture loaded"
        );
        Ok(world)
    }

    /// Check that every edge joins two defined entities
    ///
    /// # Errors
    /// `WorldError::DanglingRelationship` for the first bad edge
    pub fn check(&self) -> Result<(), WorldError> {
        let known: HashSet<&EntityId> = self.entities.iter().map(|e| &e.id).collect();
        for rel in &self.relationships {
            if !known.contains(&rel.parent_entity_id) || !known.contains(&rel.child_entity_id) {
                return Err(WorldError::DanglingRelationship {
                    parent: rel.parent_entity_id.to_string(),
                    child: rel.child_entity_id.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Build an entity graph from the fixture
    ///
    /// # Errors
    /// See [`World::check`]
    pub fn build_graph(&self) -> Result<MemoryEntityGraph, WorldError> {
        self.check()?;
        let graph = MemoryEntityGraph::new();
        for entity in &self.entities {
            graph.insert_entity(entity.clone());
        }
        for rel in &self.relationships {
            graph.link(rel.clone());
        }
        Ok(graph)
    }

    /// Build a user directory from the fixture
    #[must_use]
    pub fn build_directory(&self) -> MemoryUserDirectory {
        let users = MemoryUserDirectory::new();
        for seed in &self.users {
            users.insert(seed.id.clone(), seed.role);
        }
        users
    }
}
