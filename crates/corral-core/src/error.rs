use serde_json::Value;
use thiserror::Error;

/// Errors produced while building, reading, or updating a single element.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ElementError {
    /// A field required for construction was absent from the state.
    #[error("missing attribute: {attribute}")]
    MissingAttribute { attribute: String },

    /// A non-constructor key in the state disagrees with the constructed element.
    ///
    /// `actual` is only populated when the attribute is exposed.
    #[error("invalid element state for attribute {attribute}")]
    InvalidElementState {
        attribute: String,
        expected: Value,
        actual: Option<Value>,
    },

    /// An update tried to change an attribute outside the updatable set.
    ///
    /// `current_value` is only populated when the attribute is exposed.
    #[error("attribute value update not allowed: {attribute}")]
    AttributeValueUpdate {
        attribute: String,
        new_value: Value,
        current_value: Option<Value>,
    },

    /// A value could not be converted into the element's field type.
    #[error("invalid attribute value{}: {reason}", .attribute.as_deref().map(|a| format!(" for {a}")).unwrap_or_default())]
    InvalidAttributeValue {
        attribute: Option<String>,
        reason: String,
    },
}

impl ElementError {
    /// Wrap a serde conversion failure for `attribute`.
    pub fn invalid_value(attribute: Option<&str>, err: impl std::fmt::Display) -> Self {
        Self::InvalidAttributeValue {
            attribute: attribute.map(str::to_owned),
            reason: err.to_string(),
        }
    }
}

/// Errors produced by collection operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CollectionError {
    /// An element with this identifier is already in the collection.
    #[error("duplicate element: {identifier}")]
    DuplicateElement { identifier: String },

    /// No element with this identifier exists.
    #[error("missing element: {identifier}")]
    MissingElement { identifier: String },

    /// The element exists but does not expose a child with this name.
    #[error("element {identifier} has no child {child}")]
    MissingChild { identifier: String, child: String },

    /// A created element's identifier differs from the one it was addressed by.
    #[error("identifier mismatch: addressed as {expected}, element is {actual}")]
    IdentifierMismatch { expected: String, actual: String },

    #[error(transparent)]
    Element(#[from] ElementError),

    /// The backing storage failed in a way that is not the caller's fault.
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Result alias for element operations.
pub type ElementResult<T> = Result<T, ElementError>;

/// Result alias for collection operations.
pub type CollectionResult<T> = Result<T, CollectionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn invalid_value_display() {
        let err = ElementError::invalid_value(Some("color"), "expected a string");
        assert_eq!(
            err.to_string(),
            "invalid attribute value for color: expected a string"
        );

        let err = ElementError::invalid_value(None, "bad");
        assert_eq!(err.to_string(), "invalid attribute value: bad");
    }

    #[test]
    fn element_error_converts() {
        let err: CollectionError = ElementError::AttributeValueUpdate {
            attribute: "size".into(),
            new_value: json!(2),
            current_value: None,
        }
        .into();
        assert!(matches!(err, CollectionError::Element(_)));
        assert_eq!(err.to_string(), "attribute value update not allowed: size");
    }
}
