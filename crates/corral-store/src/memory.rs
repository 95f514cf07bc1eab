use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use corral_core::{Collection, Element, State};

use crate::error::{StoreError, StoreResult};
use crate::token::CollectionToken;
use crate::traits::Store;

/// In-memory store holding one [`Collection`] per registered token.
///
/// Not durable. The token table has its own lock; each collection keeps its
/// elements behind its own lock, so operations on different collections do
/// not contend.
pub struct MemoryStore<E: Element> {
    records: RwLock<HashMap<CollectionToken, Arc<Collection<E>>>>,
}

impl<E: Element> MemoryStore<E> {
    /// Create a store with no collections.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store with `collections` already registered.
    pub fn with_collections<I, T>(collections: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<CollectionToken>,
    {
        let records = collections
            .into_iter()
            .map(|token| (token.into(), Arc::new(Collection::default())))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Registered tokens, sorted.
    pub fn collections(&self) -> Vec<CollectionToken> {
        let mut tokens: Vec<_> = self.records.read().keys().cloned().collect();
        tokens.sort();
        tokens
    }

    fn record(&self, collection: &CollectionToken) -> StoreResult<Arc<Collection<E>>> {
        self.records
            .read()
            .get(collection)
            .cloned()
            .ok_or_else(|| StoreError::UnknownCollection {
                collection: collection.clone(),
            })
    }
}

impl<E: Element> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Element> Store<E> for MemoryStore<E> {
    async fn register(&self, collection: &CollectionToken) -> StoreResult<bool> {
        let mut records = self.records.write();
        if records.contains_key(collection) {
            return Ok(false);
        }
        records.insert(collection.clone(), Arc::new(Collection::default()));
        tracing::debug!(%collection, "collection registered");
        Ok(true)
    }

    async fn get(&self, collection: &CollectionToken, identifier: &str) -> StoreResult<E> {
        Ok(self.record(collection)?.get(identifier)?)
    }

    async fn query(
        &self,
        collection: &CollectionToken,
        start: usize,
        stop: Option<usize>,
    ) -> StoreResult<Vec<E>> {
        let record = self.record(collection)?;
        Ok(record.query(start, stop.unwrap_or(usize::MAX)))
    }

    async fn add(&self, collection: &CollectionToken, element: E) -> StoreResult<String> {
        Ok(self.record(collection)?.add(element)?)
    }

    async fn update(
        &self,
        collection: &CollectionToken,
        identifier: &str,
        state: State,
    ) -> StoreResult<()> {
        Ok(self.record(collection)?.update(identifier, state)?)
    }

    async fn remove(&self, collection: &CollectionToken, identifier: &str) -> StoreResult<E> {
        Ok(self.record(collection)?.remove(identifier)?)
    }

    async fn len(&self, collection: &CollectionToken) -> StoreResult<usize> {
        Ok(self.record(collection)?.len())
    }
}

impl<E: Element> std::fmt::Debug for MemoryStore<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("collections", &self.collections())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corral_core::fixtures::{Animal, Bikeshed};
    use serde_json::json;

    fn zoo() -> CollectionToken {
        CollectionToken::new("zoo")
    }

    async fn populated() -> MemoryStore<Animal> {
        let store = MemoryStore::with_collections(["zoo", "aquarium"]);
        for (name, species) in [("Simba", "lion"), ("Timon", "meerkat"), ("Pumbaa", "warthog")] {
            store
                .add(&zoo(), Animal::new(name, species, "bugs"))
                .await
                .unwrap();
        }
        store
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn register_is_idempotent() {
        let store: MemoryStore<Animal> = MemoryStore::new();
        assert!(store.register(&zoo()).await.unwrap());
        assert!(!store.register(&zoo()).await.unwrap());
        assert_eq!(store.collections(), vec![zoo()]);
    }

    #[tokio::test]
    async fn unknown_collection_everywhere() {
        let store: MemoryStore<Animal> = MemoryStore::new();
        let unknown = StoreError::UnknownCollection { collection: zoo() };
        assert_eq!(store.get(&zoo(), "Simba").await.unwrap_err(), unknown);
        assert_eq!(store.query(&zoo(), 0, None).await.unwrap_err(), unknown);
        assert_eq!(
            store
                .add(&zoo(), Animal::new("Simba", "lion", "warthogs"))
                .await
                .unwrap_err(),
            unknown
        );
        assert_eq!(store.remove(&zoo(), "Simba").await.unwrap_err(), unknown);
        assert_eq!(store.len(&zoo()).await.unwrap_err(), unknown);
    }

    // -----------------------------------------------------------------------
    // Element operations
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn add_get_remove() {
        let store = populated().await;
        let simba = store.get(&zoo(), "Simba").await.unwrap();
        assert_eq!(simba.attribute("species"), Some(json!("lion")));

        store.remove(&zoo(), "Simba").await.unwrap();
        assert_eq!(
            store.get(&zoo(), "Simba").await.unwrap_err(),
            StoreError::MissingElement {
                identifier: "Simba".into()
            }
        );
        assert_eq!(store.len(&zoo()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn duplicate_add_leaves_store_unchanged() {
        let store = populated().await;
        let err = store
            .add(&zoo(), Animal::new("Simba", "hyena", "lion cubs"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::DuplicateElement {
                identifier: "Simba".into()
            }
        );
        assert_eq!(store.len(&zoo()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn collections_are_independent() {
        let store = populated().await;
        let aquarium = CollectionToken::new("aquarium");
        store
            .add(&aquarium, Animal::new("Simba", "catfish", "plankton"))
            .await
            .unwrap();
        assert_eq!(store.len(&aquarium).await.unwrap(), 1);
        assert_eq!(
            store.get(&zoo(), "Simba").await.unwrap().attribute("species"),
            Some(json!("lion"))
        );
    }

    #[tokio::test]
    async fn query_ranges() {
        let store = populated().await;
        let names = |elements: Vec<Animal>| -> Vec<String> {
            elements.iter().map(|e| e.identifier().unwrap()).collect()
        };
        assert_eq!(
            names(store.query(&zoo(), 0, None).await.unwrap()),
            vec!["Simba", "Timon", "Pumbaa"]
        );
        assert_eq!(
            names(store.query(&zoo(), 1, Some(2)).await.unwrap()),
            vec!["Timon"]
        );
        assert!(store.query(&zoo(), 10, Some(20)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_is_atomic() {
        let store: MemoryStore<Bikeshed> = MemoryStore::with_collections(["sheds"]);
        let sheds = CollectionToken::new("sheds");
        store.add(&sheds, Bikeshed::new("north", "red")).await.unwrap();

        let mut state = State::new();
        state.insert("color".into(), json!("green"));
        state.insert("maximumOccupancy".into(), json!(200));
        assert!(matches!(
            store.update(&sheds, "north", state).await,
            Err(StoreError::Element(_))
        ));
        let north = store.get(&sheds, "north").await.unwrap();
        assert_eq!(north.attribute("color"), Some(json!("red")));
    }
}
