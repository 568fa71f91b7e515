//! modscope Types
//!
//! Shared vocabulary for moderator authorization.
//!
//! # Core Concepts
//!
//! - [`Scope`]: Closed sum type over the four selector strategies
//! - [`ScopePayload`]: Unvalidated scope request as submitted by an admin
//! - [`ScopeRecord`]: The single persisted scope row of a moderator
//! - [`Entity`] / [`Relationship`]: Read-only view of the entity graph
//! - [`RegionCatalog`]: Static reference list of valid regions
//!
//! # Example
//!
//! ```rust
//! use modscope_types::{Scope, ScopeKind, ScopePayload};
//!
//! let payload = ScopePayload::city("Maharashtra", "Mumbai");
//! assert_eq!(payload.kind().unwrap(), ScopeKind::City);
//!
//! let scope = Scope::City {
//!     state: "Maharashtra".into(),
//!     city: "Mumbai".into(),
//! };
//! assert_eq!(scope.kind(), ScopeKind::City);
//! assert_eq!(scope.entity_id(), None);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod entity;
mod error;
mod ids;
mod region;
mod scope;

// Re-exports
pub use entity::{Entity, EntityType, Relationship, Role};
pub use error::ValidationError;
pub use ids::{EntityId, ScopeRecordId, UserId};
pub use region::{RegionCatalog, INDIAN_STATES};
pub use scope::{Scope, ScopeKind, ScopePayload, ScopeRecord, ScopeSelectors};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
