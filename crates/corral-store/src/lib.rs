//! Multi-collection element storage for Corral.
//!
//! A [`Store`] keeps many named collections of one element type, addressed
//! by [`CollectionToken`]. Each collection follows the same contract as an
//! in-memory [`corral_core::Collection`]: unique identifiers, insertion-order
//! range queries, and all-or-nothing updates.
//!
//! # Backends
//!
//! - [`MemoryStore`] -- one `Collection` per token, for tests and embedding
//!
//! [`ScopedStore`] binds a store to one token, and [`StoredCollection`]
//! exposes that scope to resource adapters as an
//! [`ExposedCollection`](corral_core::ExposedCollection).
//!
//! # Rules
//!
//! 1. Collections must be registered before use; nothing is created
//!    implicitly.
//! 2. Operations on different collections never observe each other.
//! 3. Store failures other than element conditions reach adapters as
//!    backend errors.

pub mod error;
pub mod memory;
pub mod scoped;
pub mod token;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use scoped::{ScopedStore, StoredCollection};
pub use token::CollectionToken;
pub use traits::Store;
