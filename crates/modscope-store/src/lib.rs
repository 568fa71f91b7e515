//! modscope Store
//!
//! Narrow read/write contracts for everything the authorization core
//! consults, plus in-memory implementations.
//!
//! # Overview
//!
//! - **ScopeStore**: one scope row per moderator, replaced atomically
//! - **EntityGraph**: read-only entity lookup and direct edge lookup
//! - **UserDirectory**: user roles
//! - **World**: serde fixture that seeds the in-memory stores
//!
//! # Example
//!
//! ```rust
//! use modscope_store::{MemoryScopeStore, ScopeStore};
//! use modscope_types::{Scope, UserId};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = MemoryScopeStore::new();
//! let moderator = UserId::new("mod-1");
//!
//! store.replace(&moderator, Scope::All, None).await.unwrap();
//! let record = store.get(&moderator).await.unwrap().unwrap();
//! assert_eq!(record.scope, Scope::All);
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod memory;
pub mod traits;
pub mod world;

// Re-exports
pub use error::{StoreError, WorldError};
pub use memory::{MemoryEntityGraph, MemoryScopeStore, MemoryUserDirectory};
pub use traits::{EntityGraph, ScopeStore, UserDirectory};
pub use world::{ScopeSeed, UserSeed, World};

#[cfg(feature = "mocks")]
pub use traits::{MockEntityGraph, MockScopeStore, MockUserDirectory};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
