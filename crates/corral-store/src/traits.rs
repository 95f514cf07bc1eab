use async_trait::async_trait;

use corral_core::{Element, State};

use crate::error::StoreResult;
use crate::token::CollectionToken;

/// Storage for many named collections of `E`.
///
/// Every operation takes the collection first and then follows the
/// single-collection contract of [`corral_core::Collection`]:
/// - identifiers are unique per collection; a duplicate add changes nothing
/// - range queries clamp their bounds and never fail for that reason
/// - updates are all-or-nothing
///
/// Operations on a token that was never registered fail with
/// [`StoreError::UnknownCollection`](crate::StoreError::UnknownCollection).
#[async_trait]
pub trait Store<E: Element>: Send + Sync {
    /// Make `collection` known to the store.
    ///
    /// Returns `false` if it was already registered (a no-op).
    async fn register(&self, collection: &CollectionToken) -> StoreResult<bool>;

    /// The element with this identifier.
    async fn get(&self, collection: &CollectionToken, identifier: &str) -> StoreResult<E>;

    /// Elements in `[start, stop)`; `stop = None` means to the end.
    async fn query(
        &self,
        collection: &CollectionToken,
        start: usize,
        stop: Option<usize>,
    ) -> StoreResult<Vec<E>>;

    /// Add an element and return its identifier.
    async fn add(&self, collection: &CollectionToken, element: E) -> StoreResult<String>;

    /// Apply a partial state to one element.
    async fn update(
        &self,
        collection: &CollectionToken,
        identifier: &str,
        state: State,
    ) -> StoreResult<()>;

    /// Remove and return the element with this identifier.
    async fn remove(&self, collection: &CollectionToken, identifier: &str) -> StoreResult<E>;

    /// Number of elements in `collection`.
    async fn len(&self, collection: &CollectionToken) -> StoreResult<usize>;
}
