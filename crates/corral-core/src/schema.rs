//! Construction schemas for element types.
//!
//! An element type lists the fields its constructor takes, in order, and
//! whether each one must be present. [`partition`] uses that list to split an
//! incoming state into constructor arguments and leftover attributes that
//! must be verified against the constructed element.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ElementError, ElementResult};
use crate::state::State;

/// One constructor field of an element type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub required: bool,
}

impl Field {
    /// A field that must appear in the state.
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
        }
    }

    /// A field the constructor can default.
    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
        }
    }
}

/// Split `state` into `(constructor args, leftover)` according to `schema`.
///
/// Fails with [`ElementError::MissingAttribute`] on the first required field
/// (in schema order) that is absent.
pub fn partition(schema: &[Field], mut state: State) -> ElementResult<(State, State)> {
    let mut args = State::new();
    for field in schema {
        match state.remove(field.name) {
            Some(value) => {
                args.insert(field.name.to_owned(), value);
            }
            None if field.required => {
                return Err(ElementError::MissingAttribute {
                    attribute: field.name.to_owned(),
                });
            }
            None => {}
        }
    }
    Ok((args, state))
}

/// Deserialize constructor arguments into a typed parameter struct.
pub fn decode_args<T: DeserializeOwned>(args: State) -> ElementResult<T> {
    serde_json::from_value(Value::Object(args)).map_err(|e| ElementError::invalid_value(None, e))
}

/// Deserialize one attribute value into its field type.
pub fn decode_value<T: DeserializeOwned>(attribute: &str, value: Value) -> ElementResult<T> {
    serde_json::from_value(value).map_err(|e| ElementError::invalid_value(Some(attribute), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    const SCHEMA: &[Field] = &[Field::required("name"), Field::optional("color")];

    fn state(value: Value) -> State {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn splits_constructor_args_from_leftovers() {
        let (args, rest) = partition(
            SCHEMA,
            state(json!({"name": "north", "color": "red", "maximumOccupancy": 100})),
        )
        .unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest["maximumOccupancy"], json!(100));
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let (args, rest) = partition(SCHEMA, state(json!({"name": "north"}))).unwrap();
        assert_eq!(args.len(), 1);
        assert!(rest.is_empty());
    }

    #[test]
    fn required_fields_must_be_present() {
        let err = partition(SCHEMA, state(json!({"color": "red"}))).unwrap_err();
        assert_eq!(
            err,
            ElementError::MissingAttribute {
                attribute: "name".into()
            }
        );
    }

    #[test]
    fn decode_reports_attribute() {
        #[derive(Deserialize)]
        struct Args {
            #[allow(dead_code)]
            name: String,
        }
        assert!(decode_args::<Args>(state(json!({"name": 3}))).is_err());

        let err = decode_value::<u32>("size", json!("big")).unwrap_err();
        assert!(matches!(
            err,
            ElementError::InvalidAttributeValue { attribute: Some(ref a), .. } if a == "size"
        ));
    }
}
