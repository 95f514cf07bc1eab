//! Elements and collections for Corral REST APIs.
//!
//! An [`Element`] is a domain object with a named identity, a declared set of
//! exposed attributes, and a subset of those that may be updated. A
//! [`Collection`] holds elements in insertion order and indexes them by
//! identifier. Resource adapters talk to collections through the object-safe
//! [`ExposedCollection`] trait, which works purely in identifiers and
//! [`State`] maps.
//!
//! # Rules
//!
//! 1. Identifiers are unique within a collection; a duplicate add fails and
//!    changes nothing.
//! 2. Updates are all-or-nothing: an attribute outside the updatable set may
//!    appear in an update only with its current value.
//! 3. Non-exposed attribute values never leave an element, not even inside
//!    error details.
//! 4. Range queries clamp their bounds and never fail.

pub mod collection;
pub mod element;
pub mod error;
pub mod exposed;
pub mod schema;
pub mod state;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use collection::{Collection, CollectionConfig};
pub use element::Element;
pub use error::{CollectionError, CollectionResult, ElementError, ElementResult};
pub use exposed::{check_identifier, child_of, ExposedCollection};
pub use schema::{decode_args, decode_value, Field};
pub use state::{identifier_of, State, DEFAULT_IDENTIFYING_ATTRIBUTE};
