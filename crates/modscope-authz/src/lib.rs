//! modscope Authorization
//!
//! Decides whether a moderator may edit an entity, validates scope
//! requests before they are persisted, and renders scopes for display.
//!
//! # Core Concepts
//!
//! - [`ScopeValidator`]: payload → typed [`Scope`](modscope_types::Scope)
//! - [`AuthorizationEngine`]: fail-closed `can_moderate` decisions
//! - [`ScopeDescriber`]: human-readable scope labels
//! - [`LookupDeadline`]: optional bound on every collaborator read
//!
//! # Example
//!
//! ```rust
//! use modscope_authz::AuthorizationEngine;
//! use modscope_store::{MemoryEntityGraph, MemoryScopeStore, ScopeStore};
//! use modscope_types::{Entity, EntityId, EntityType, Scope, UserId};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let scopes = Arc::new(MemoryScopeStore::new());
//! let graph = Arc::new(MemoryEntityGraph::new());
//! graph.insert_entity(
//!     Entity::new("a", "Gateway Trust", EntityType::Organization)
//!         .located("Maharashtra", "Mumbai"),
//! );
//!
//! let moderator = UserId::new("mod-1");
//! let scope = Scope::State { state: "Maharashtra".into() };
//! scopes.replace(&moderator, scope, None).await.unwrap();
//!
//! let engine = AuthorizationEngine::new(scopes, graph);
//! assert!(engine.can_moderate(&moderator, &EntityId::new("a")).await);
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod deadline;
mod describe;
mod engine;
mod error;
mod validator;

// Re-exports
pub use deadline::LookupDeadline;
pub use describe::{ScopeDescriber, ALL_ENTITIES_LABEL, UNKNOWN_ENTITY_LABEL};
pub use engine::{AuthorizationEngine, Decision, DecisionReason};
pub use error::{DecisionError, ValidatorError};
pub use validator::{ScopeValidator, DEFAULT_MAX_CITY_LEN};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
