//! Attribute state as exchanged with clients.

use serde_json::{Map, Value};

/// A mapping from attribute name to a JSON-compatible value.
pub type State = Map<String, Value>;

/// The identifying attribute used when an element type does not pick one.
pub const DEFAULT_IDENTIFYING_ATTRIBUTE: &str = "name";

/// Render an identifying attribute value as the string used in paths and
/// indexes.
///
/// Strings are used verbatim; every other value uses its JSON rendering, so
/// `7` becomes `"7"` and `true` becomes `"true"`.
pub fn identifier_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_identifiers_are_verbatim() {
        assert_eq!(identifier_of(&json!("north")), "north");
    }

    #[test]
    fn scalar_identifiers_use_json_rendering() {
        assert_eq!(identifier_of(&json!(7)), "7");
        assert_eq!(identifier_of(&json!(true)), "true");
        assert_eq!(identifier_of(&Value::Null), "null");
    }
}
