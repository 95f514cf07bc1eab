//! The capability the HTTP adapter needs from a collection.
//!
//! [`ExposedCollection`] is object safe and speaks only in identifiers and
//! [`State`] maps, so resource handlers can hold `Arc<dyn ExposedCollection>`
//! without knowing the element type or the backing storage.

use std::sync::Arc;

use async_trait::async_trait;

use crate::collection::{Collection, CollectionConfig};
use crate::element::Element;
use crate::error::{CollectionError, CollectionResult};
use crate::state::State;

/// A collection as seen by a resource adapter.
#[async_trait]
pub trait ExposedCollection: Send + Sync {
    /// Listing limits for this collection.
    fn config(&self) -> CollectionConfig;

    /// Listing states for `[start, stop)`, restricted to the collection's
    /// listing attributes.
    async fn query_states(&self, start: usize, stop: usize) -> CollectionResult<Vec<State>>;

    /// The full exposed state of one element.
    async fn element_state(&self, identifier: &str) -> CollectionResult<State>;

    async fn contains(&self, identifier: &str) -> CollectionResult<bool>;

    /// Build an element from `state` and add it. Returns its identifier.
    async fn create(&self, state: State) -> CollectionResult<String>;

    /// Like [`create`](ExposedCollection::create), but the new element must
    /// be identified by `identifier`.
    async fn create_at(&self, identifier: &str, state: State) -> CollectionResult<String>;

    /// Apply a partial state to one element.
    async fn update_element(&self, identifier: &str, state: State) -> CollectionResult<()>;

    async fn remove_element(&self, identifier: &str) -> CollectionResult<()>;

    /// The sub-collection `name` below element `identifier`.
    async fn child(
        &self,
        identifier: &str,
        name: &str,
    ) -> CollectionResult<Arc<dyn ExposedCollection>>;
}

/// Fail with [`CollectionError::IdentifierMismatch`] unless `element` is
/// identified by `expected`.
pub fn check_identifier<E: Element>(expected: &str, element: &E) -> CollectionResult<()> {
    let actual = element.identifier()?;
    if actual != expected {
        return Err(CollectionError::IdentifierMismatch {
            expected: expected.to_owned(),
            actual,
        });
    }
    Ok(())
}

/// Resolve child `name` of `element`, honoring the element type's declared
/// children.
pub fn child_of<E: Element>(
    identifier: &str,
    element: &E,
    name: &str,
) -> CollectionResult<Arc<dyn ExposedCollection>> {
    E::children()
        .contains(&name)
        .then(|| element.child(name))
        .flatten()
        .ok_or_else(|| CollectionError::MissingChild {
            identifier: identifier.to_owned(),
            child: name.to_owned(),
        })
}

#[async_trait]
impl<E: Element> ExposedCollection for Collection<E> {
    fn config(&self) -> CollectionConfig {
        Collection::config(self)
    }

    async fn query_states(&self, start: usize, stop: usize) -> CollectionResult<Vec<State>> {
        Ok(Collection::query_states(self, start, stop))
    }

    async fn element_state(&self, identifier: &str) -> CollectionResult<State> {
        self.with_element(identifier, E::to_state)
    }

    async fn contains(&self, identifier: &str) -> CollectionResult<bool> {
        Ok(Collection::contains(self, identifier))
    }

    async fn create(&self, state: State) -> CollectionResult<String> {
        let element = self.create_element_from_state(state)?;
        let identifier = self.add(element)?;
        tracing::info!(%identifier, "element created");
        Ok(identifier)
    }

    async fn create_at(&self, identifier: &str, state: State) -> CollectionResult<String> {
        let element = self.create_element_from_state(state)?;
        check_identifier(identifier, &element)?;
        let identifier = self.add(element)?;
        tracing::info!(%identifier, "element created");
        Ok(identifier)
    }

    async fn update_element(&self, identifier: &str, state: State) -> CollectionResult<()> {
        self.update(identifier, state)?;
        tracing::info!(%identifier, "element updated");
        Ok(())
    }

    async fn remove_element(&self, identifier: &str) -> CollectionResult<()> {
        self.remove(identifier)?;
        tracing::info!(%identifier, "element removed");
        Ok(())
    }

    async fn child(
        &self,
        identifier: &str,
        name: &str,
    ) -> CollectionResult<Arc<dyn ExposedCollection>> {
        self.with_element(identifier, |element| child_of(identifier, element, name))?
    }
}
