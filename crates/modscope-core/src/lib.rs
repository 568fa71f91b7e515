//! modscope Core
//!
//! Administrative service for moderator scopes. Wires the validator,
//! authorization engine and describer over the collaborator stores and
//! enforces the admin-only contract on every mutating operation.
//!
//! # Example
//!
//! ```rust
//! use modscope_core::{Caller, ModerationConfig, ModerationService};
//! use modscope_store::World;
//! use modscope_types::{EntityId, ScopePayload, UserId};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let world = World::from_yaml_str(r#"
//! entities:
//!   - { id: a, name: Gateway Trust, entity_type: organization, state: Maharashtra, city: Mumbai }
//! users:
//!   - { id: admin-1, role: admin }
//!   - { id: mod-1, role: moderator }
//! "#).unwrap();
//!
//! let service = ModerationService::from_world(ModerationConfig::default(), &world)
//!     .await
//!     .unwrap();
//!
//! let moderator = UserId::new("mod-1");
//! service
//!     .assign_scope(&Caller::admin("admin-1"), &moderator, &ScopePayload::state("Maharashtra"))
//!     .await
//!     .unwrap();
//! assert!(service.can_moderate(&moderator, &EntityId::new("a")).await);
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod service;
pub mod types;

// Re-exports
pub use config::ModerationConfig;
pub use error::{ConfigError, ModerationError, SetupError};
pub use service::ModerationService;
pub use types::{ActionOutcome, Caller, ScopeInfo, ScopeSummary};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
