//! The [`Element`] trait: a single addressable object exposed through the API.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{ElementError, ElementResult};
use crate::exposed::ExposedCollection;
use crate::schema::{partition, Field};
use crate::state::{identifier_of, State, DEFAULT_IDENTIFYING_ATTRIBUTE};

/// A domain object with a named identity, a set of exposed attributes, and a
/// subset of those that clients may change.
///
/// Implementors describe their shape with associated functions and provide
/// raw attribute access; state export, construction from state, and the
/// all-or-nothing update protocol are provided.
///
/// Invariants:
/// - Attributes outside [`exposed_attributes`](Element::exposed_attributes)
///   are never emitted, including inside error details.
/// - An update either applies every requested change or none of them.
/// - The identifying attribute is immutable unless explicitly listed as
///   updatable (which would break collection indexing, so don't).
pub trait Element: Clone + Send + Sync + 'static {
    /// Ordered constructor fields.
    fn schema() -> &'static [Field];

    /// Build an element from the constructor arguments selected by
    /// [`schema`](Element::schema). Every required field is present.
    fn construct(args: State) -> ElementResult<Self>;

    /// Attribute names serializable to external state. State maps emit
    /// their keys sorted, whatever the order here.
    fn exposed_attributes() -> &'static [&'static str];

    /// Attribute names that may be changed by [`update`](Element::update).
    fn updatable_attributes() -> &'static [&'static str] {
        &[]
    }

    /// The attribute whose value identifies the element in its collection.
    fn identifying_attribute() -> &'static str {
        DEFAULT_IDENTIFYING_ATTRIBUTE
    }

    /// Names of the sub-collections reachable below this element.
    fn children() -> &'static [&'static str] {
        &[]
    }

    /// Read an attribute. `None` if the element has no such attribute.
    fn attribute(&self, name: &str) -> Option<Value>;

    /// Assign an attribute. Only called for updatable attributes.
    fn set_attribute(&mut self, name: &str, value: Value) -> ElementResult<()>;

    /// Read an attribute in its serialized form.
    ///
    /// Override for attributes whose raw form is not what clients should see.
    fn serializable_attribute(&self, name: &str) -> Option<Value> {
        self.attribute(name)
    }

    /// The sub-collection named `name`, if this element has one.
    fn child(&self, _name: &str) -> Option<Arc<dyn ExposedCollection>> {
        None
    }

    /// The string form of the identifying attribute's value.
    fn identifier(&self) -> ElementResult<String> {
        let attribute = Self::identifying_attribute();
        self.attribute(attribute)
            .map(|value| identifier_of(&value))
            .ok_or_else(|| ElementError::InvalidElementState {
                attribute: attribute.to_owned(),
                expected: Value::Null,
                actual: None,
            })
    }

    /// The full exposed state.
    fn to_state(&self) -> State {
        self.to_state_with(Self::exposed_attributes())
    }

    /// The state restricted to `attrs`. Unreadable attributes are `null`.
    fn to_state_with(&self, attrs: &[&str]) -> State {
        attrs
            .iter()
            .map(|attr| {
                let value = self.serializable_attribute(attr).unwrap_or(Value::Null);
                ((*attr).to_owned(), value)
            })
            .collect()
    }

    /// Build an element from a state mapping.
    ///
    /// Keys named in the schema feed the constructor; every other key must
    /// already equal the constructed element's serialized attribute.
    fn from_state(state: State) -> ElementResult<Self> {
        let (args, leftover) = partition(Self::schema(), state)?;
        let element = Self::construct(args)?;

        for (attribute, expected) in leftover {
            let actual = element.serializable_attribute(&attribute);
            if actual.as_ref() != Some(&expected) {
                tracing::debug!(%attribute, "state disagrees with constructed element");
                let actual = actual.filter(|_| is_exposed::<Self>(&attribute));
                return Err(ElementError::InvalidElementState {
                    attribute,
                    expected,
                    actual,
                });
            }
        }

        Ok(element)
    }

    /// Apply a partial state.
    ///
    /// Every key is checked before anything is assigned: updatable keys are
    /// staged, other keys must match the current value. Staged values are
    /// applied to a copy that replaces `self` only once all assignments
    /// succeed.
    fn update(&mut self, state: State) -> ElementResult<()> {
        let updatable = Self::updatable_attributes();
        let mut staged = Vec::with_capacity(state.len());

        for (attribute, new_value) in state {
            if updatable.contains(&attribute.as_str()) {
                staged.push((attribute, new_value));
                continue;
            }

            let current = self.serializable_attribute(&attribute);
            if current.as_ref() == Some(&new_value) {
                continue;
            }

            let current_value = current.filter(|_| is_exposed::<Self>(&attribute));
            return Err(ElementError::AttributeValueUpdate {
                attribute,
                new_value,
                current_value,
            });
        }

        let mut updated = self.clone();
        for (attribute, value) in staged {
            updated.set_attribute(&attribute, value)?;
        }
        *self = updated;
        Ok(())
    }
}

fn is_exposed<E: Element>(attribute: &str) -> bool {
    E::exposed_attributes().contains(&attribute)
}
