use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use corral_core::{
    check_identifier, child_of, CollectionConfig, CollectionError, CollectionResult, Element,
    ExposedCollection, State,
};

use crate::error::{StoreError, StoreResult};
use crate::token::CollectionToken;
use crate::traits::Store;

/// A store bound to one collection token.
pub struct ScopedStore<E: Element> {
    store: Arc<dyn Store<E>>,
    collection: CollectionToken,
}

impl<E: Element> ScopedStore<E> {
    pub fn new(store: Arc<dyn Store<E>>, collection: impl Into<CollectionToken>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &CollectionToken {
        &self.collection
    }

    pub async fn register(&self) -> StoreResult<bool> {
        self.store.register(&self.collection).await
    }

    pub async fn get(&self, identifier: &str) -> StoreResult<E> {
        self.store.get(&self.collection, identifier).await
    }

    pub async fn query(&self, start: usize, stop: Option<usize>) -> StoreResult<Vec<E>> {
        self.store.query(&self.collection, start, stop).await
    }

    pub async fn add(&self, element: E) -> StoreResult<String> {
        self.store.add(&self.collection, element).await
    }

    pub async fn update(&self, identifier: &str, state: State) -> StoreResult<()> {
        self.store.update(&self.collection, identifier, state).await
    }

    pub async fn remove(&self, identifier: &str) -> StoreResult<E> {
        self.store.remove(&self.collection, identifier).await
    }

    pub async fn len(&self) -> StoreResult<usize> {
        self.store.len(&self.collection).await
    }
}

impl<E: Element> Clone for ScopedStore<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collection: self.collection.clone(),
        }
    }
}

impl<E: Element> fmt::Debug for ScopedStore<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedStore")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

/// Exposes one store-backed collection to resource adapters.
///
/// Behaves like an in-memory [`corral_core::Collection`] but every element
/// operation goes through the store. Store failures that are not element
/// conditions surface as [`CollectionError::Backend`].
pub struct StoredCollection<E: Element> {
    scope: ScopedStore<E>,
    config: CollectionConfig,
    listing: Vec<&'static str>,
}

impl<E: Element> StoredCollection<E> {
    pub fn new(scope: ScopedStore<E>, config: CollectionConfig) -> Self {
        Self {
            scope,
            config,
            listing: E::exposed_attributes().to_vec(),
        }
    }

    /// Restrict the attributes shown when listing. Names the element type
    /// does not expose are dropped.
    pub fn with_exposed_attributes(mut self, attrs: &[&str]) -> Self {
        self.listing = E::exposed_attributes()
            .iter()
            .copied()
            .filter(|name| attrs.contains(name))
            .collect();
        self
    }

    pub fn scope(&self) -> &ScopedStore<E> {
        &self.scope
    }
}

#[async_trait]
impl<E: Element> ExposedCollection for StoredCollection<E> {
    fn config(&self) -> CollectionConfig {
        self.config
    }

    async fn query_states(&self, start: usize, stop: usize) -> CollectionResult<Vec<State>> {
        let elements = self.scope.query(start, Some(stop)).await?;
        Ok(elements
            .iter()
            .map(|element| element.to_state_with(&self.listing))
            .collect())
    }

    async fn element_state(&self, identifier: &str) -> CollectionResult<State> {
        Ok(self.scope.get(identifier).await?.to_state())
    }

    async fn contains(&self, identifier: &str) -> CollectionResult<bool> {
        match self.scope.get(identifier).await {
            Ok(_) => Ok(true),
            Err(StoreError::MissingElement { .. }) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn create(&self, state: State) -> CollectionResult<String> {
        let element = E::from_state(state)?;
        let identifier = self.scope.add(element).await?;
        tracing::info!(collection = %self.scope.collection(), %identifier, "element created");
        Ok(identifier)
    }

    async fn create_at(&self, identifier: &str, state: State) -> CollectionResult<String> {
        let element = E::from_state(state)?;
        check_identifier(identifier, &element)?;
        let identifier = self.scope.add(element).await?;
        tracing::info!(collection = %self.scope.collection(), %identifier, "element created");
        Ok(identifier)
    }

    async fn update_element(&self, identifier: &str, state: State) -> CollectionResult<()> {
        self.scope.update(identifier, state).await?;
        tracing::info!(collection = %self.scope.collection(), %identifier, "element updated");
        Ok(())
    }

    async fn remove_element(&self, identifier: &str) -> CollectionResult<()> {
        self.scope.remove(identifier).await?;
        tracing::info!(collection = %self.scope.collection(), %identifier, "element removed");
        Ok(())
    }

    async fn child(
        &self,
        identifier: &str,
        name: &str,
    ) -> CollectionResult<Arc<dyn ExposedCollection>> {
        let element = self.scope.get(identifier).await.map_err(CollectionError::from)?;
        child_of(identifier, &element, name)
    }
}
