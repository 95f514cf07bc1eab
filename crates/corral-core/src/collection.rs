//! Ordered, identifier-indexed element containers.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::error::{CollectionError, CollectionResult, ElementResult};
use crate::state::State;

/// Per-collection listing limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollectionConfig {
    /// Page size used when a listing request names no `stop`.
    pub page_size: usize,
    /// Largest page a client may request.
    pub max_page_size: usize,
}

impl CollectionConfig {
    pub const fn new(page_size: usize, max_page_size: usize) -> Self {
        Self {
            page_size,
            max_page_size,
        }
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self::new(10, 100)
    }
}

/// Insertion-ordered elements plus a hash index from identifier to element.
struct Entries<E> {
    order: Vec<String>,
    index: HashMap<String, E>,
}

impl<E> Entries<E> {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            index: HashMap::new(),
        }
    }
}

/// An ordered set of elements with unique identifiers.
///
/// The order list and the index live behind one lock, so readers never see
/// an add or remove half-applied and the uniqueness check in [`add`] is
/// atomic with the insert. Elements are cloned out on read.
///
/// [`add`]: Collection::add
pub struct Collection<E: Element> {
    config: CollectionConfig,
    exposed_element_attributes: Vec<&'static str>,
    entries: RwLock<Entries<E>>,
}

impl<E: Element> Collection<E> {
    /// Create an empty collection that lists every exposed attribute.
    pub fn new(config: CollectionConfig) -> Self {
        Self {
            config,
            exposed_element_attributes: E::exposed_attributes().to_vec(),
            entries: RwLock::new(Entries::new()),
        }
    }

    /// Restrict the attributes shown when listing this collection.
    ///
    /// Names that the element type does not expose are dropped.
    pub fn with_exposed_attributes(mut self, attrs: &[&str]) -> Self {
        let exposed = E::exposed_attributes();
        self.exposed_element_attributes = exposed
            .iter()
            .copied()
            .filter(|name| attrs.contains(name))
            .collect();
        for attr in attrs {
            if !exposed.contains(attr) {
                tracing::warn!(attribute = %attr, "ignoring listing attribute the element does not expose");
            }
        }
        self
    }

    pub fn config(&self) -> CollectionConfig {
        self.config
    }

    /// Attributes revealed for each element when listing.
    pub fn exposed_element_attributes(&self) -> &[&'static str] {
        &self.exposed_element_attributes
    }

    /// Build (but do not add) an element from state.
    pub fn create_element_from_state(&self, state: State) -> ElementResult<E> {
        E::from_state(state)
    }

    /// Add an element, returning its identifier.
    pub fn add(&self, element: E) -> CollectionResult<String> {
        let identifier = element.identifier()?;
        let mut entries = self.entries.write();
        if entries.index.contains_key(&identifier) {
            return Err(CollectionError::DuplicateElement { identifier });
        }
        entries.order.push(identifier.clone());
        entries.index.insert(identifier.clone(), element);
        Ok(identifier)
    }

    /// Remove and return the element with this identifier.
    pub fn remove(&self, identifier: &str) -> CollectionResult<E> {
        let mut entries = self.entries.write();
        let element = entries
            .index
            .remove(identifier)
            .ok_or_else(|| missing(identifier))?;
        entries.order.retain(|id| id != identifier);
        Ok(element)
    }

    /// A copy of the element with this identifier.
    pub fn get(&self, identifier: &str) -> CollectionResult<E> {
        self.entries
            .read()
            .index
            .get(identifier)
            .cloned()
            .ok_or_else(|| missing(identifier))
    }

    /// Run `f` against the element with this identifier without cloning it.
    pub fn with_element<T>(&self, identifier: &str, f: impl FnOnce(&E) -> T) -> CollectionResult<T> {
        let entries = self.entries.read();
        let element = entries.index.get(identifier).ok_or_else(|| missing(identifier))?;
        Ok(f(element))
    }

    /// Apply a partial state to one element. All-or-nothing.
    pub fn update(&self, identifier: &str, state: State) -> CollectionResult<()> {
        let mut entries = self.entries.write();
        let element = entries
            .index
            .get_mut(identifier)
            .ok_or_else(|| missing(identifier))?;
        element.update(state)?;
        Ok(())
    }

    /// Elements in `[start, stop)` of insertion order. Out-of-range bounds
    /// are clamped; the result may be empty.
    pub fn query(&self, start: usize, stop: usize) -> Vec<E> {
        let entries = self.entries.read();
        let (start, stop) = clamp(start, stop, entries.order.len());
        entries.order[start..stop]
            .iter()
            .filter_map(|id| entries.index.get(id).cloned())
            .collect()
    }

    /// Listing states of the elements in `[start, stop)`.
    pub fn query_states(&self, start: usize, stop: usize) -> Vec<State> {
        let entries = self.entries.read();
        let (start, stop) = clamp(start, stop, entries.order.len());
        entries.order[start..stop]
            .iter()
            .filter_map(|id| entries.index.get(id))
            .map(|element| element.to_state_with(&self.exposed_element_attributes))
            .collect()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.read().index.contains_key(identifier)
    }

    /// Identifiers in insertion order.
    pub fn identifiers(&self) -> Vec<String> {
        self.entries.read().order.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Element> Default for Collection<E> {
    fn default() -> Self {
        Self::new(CollectionConfig::default())
    }
}

impl<E: Element> std::fmt::Debug for Collection<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("config", &self.config)
            .field("element_count", &self.len())
            .finish()
    }
}

fn missing(identifier: &str) -> CollectionError {
    CollectionError::MissingElement {
        identifier: identifier.to_owned(),
    }
}

pub(crate) fn clamp(start: usize, stop: usize, len: usize) -> (usize, usize) {
    let stop = stop.min(len);
    (start.min(stop), stop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, Animal, Bikeshed};
    use serde_json::{json, Value};

    fn names(elements: &[Animal]) -> Vec<String> {
        elements.iter().map(|a| a.identifier().unwrap()).collect()
    }

    #[test]
    fn add_and_get() {
        let zoo = fixtures::zoo();
        zoo.add(Animal::new("Simba", "lion", "warthogs")).unwrap();
        let simba = zoo.get("Simba").unwrap();
        assert_eq!(simba.attribute("species"), Some(json!("lion")));
        assert_eq!(zoo.len(), 1);
    }

    #[test]
    fn duplicate_add_fails_and_leaves_collection_unchanged() {
        let zoo = fixtures::zoo();
        zoo.add(Animal::new("Simba", "lion", "warthogs")).unwrap();
        let err = zoo.add(Animal::new("Simba", "hyena", "lion cubs")).unwrap_err();
        assert_eq!(
            err,
            CollectionError::DuplicateElement {
                identifier: "Simba".into()
            }
        );
        assert_eq!(zoo.len(), 1);
        assert_eq!(zoo.get("Simba").unwrap().attribute("species"), Some(json!("lion")));
    }

    #[test]
    fn remove_missing_element() {
        let zoo = fixtures::zoo();
        assert!(matches!(
            zoo.remove("Nala"),
            Err(CollectionError::MissingElement { .. })
        ));
        assert!(matches!(
            zoo.get("Nala"),
            Err(CollectionError::MissingElement { .. })
        ));
    }

    #[test]
    fn remove_preserves_order_of_the_rest() {
        let zoo = fixtures::populated_zoo();
        zoo.remove("Timon").unwrap();
        assert!(!zoo.contains("Timon"));
        assert_eq!(
            names(&zoo.query(0, 4)),
            vec!["Pumbaa", "Simba", "Rafiki", "Zazu"]
        );
    }

    #[test]
    fn query_is_insertion_ordered_and_clamped() {
        let zoo = fixtures::populated_zoo();
        assert_eq!(names(&zoo.query(0, 3)), vec!["Pumbaa", "Simba", "Timon"]);
        assert_eq!(names(&zoo.query(6, 100)), vec!["Banzai", "Ed"]);
        assert!(zoo.query(50, 60).is_empty());
        assert!(zoo.query(5, 2).is_empty());
    }

    #[test]
    fn query_states_use_listing_attributes() {
        let zoo = fixtures::populated_zoo();
        let states = zoo.query_states(0, 1);
        assert_eq!(
            Value::Object(states[0].clone()),
            json!({"name": "Pumbaa", "species": "warthog"})
        );
    }

    #[test]
    fn listing_attributes_cannot_widen_exposure() {
        let lockers = Collection::<fixtures::Locker>::default()
            .with_exposed_attributes(&["name", "combination"]);
        assert_eq!(lockers.exposed_element_attributes(), &["name"]);
    }

    #[test]
    fn update_through_collection_is_atomic() {
        let sheds = fixtures::software_project();
        sheds.add(Bikeshed::new("north", "red")).unwrap();
        let mut state = State::new();
        state.insert("color".into(), json!("green"));
        state.insert("maximumOccupancy".into(), json!(200));
        assert!(sheds.update("north", state).is_err());
        assert_eq!(
            sheds.with_element("north", |s| s.attribute("color")).unwrap(),
            Some(json!("red"))
        );
    }

    #[test]
    fn create_element_from_state() {
        let sheds = fixtures::software_project();
        let mut state = State::new();
        state.insert("name".into(), json!("west"));
        state.insert("color".into(), json!("yellow"));
        let shed = sheds.create_element_from_state(state).unwrap();
        assert_eq!(sheds.add(shed).unwrap(), "west");
        assert_eq!(sheds.identifiers(), vec!["west"]);
    }

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(0, 3, 8), (0, 3));
        assert_eq!(clamp(6, 9, 8), (6, 8));
        assert_eq!(clamp(9, 12, 8), (8, 8));
        assert_eq!(clamp(4, 2, 8), (2, 2));
    }

    #[test]
    fn default_config() {
        let c = CollectionConfig::default();
        assert_eq!(c.page_size, 10);
        assert_eq!(c.max_page_size, 100);
    }
}
