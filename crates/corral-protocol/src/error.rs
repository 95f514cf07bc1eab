//! The serializable error taxonomy.
//!
//! Every [`ApiError`] carries a response code, a short message, and a
//! details map, and renders as `{"errorMessage": ..., "errorDetails": ...}`.

use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use corral_core::{CollectionError, ElementError};

/// An error that can be rendered as a response body.
pub trait SerializableError {
    /// HTTP-style status code.
    fn response_code(&self) -> u16;

    /// Human-readable message.
    fn message(&self) -> String;

    /// Error-specific details.
    fn details(&self) -> Map<String, Value>;

    /// The response body shape shared by every error.
    fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error_message: self.message(),
            error_details: self.details(),
        }
    }
}

/// Wire form of a [`SerializableError`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_message: String,
    pub error_details: Map<String, Value>,
}

impl ErrorBody {
    pub fn to_value(&self) -> Result<Value, CodecError> {
        serde_json::to_value(self).map_err(|e| CodecError::Encode(e.to_string()))
    }
}

/// Failure inside an encoder or decoder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("encode failed: {0}")]
    Encode(String),

    #[error("decode failed: {0}")]
    Decode(String),
}

/// Every condition a resource adapter reports to clients.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    #[error("no acceptable decoder available for given content type")]
    UnsupportedContentType {
        supported: Vec<String>,
        provided: String,
    },

    #[error("request didn't specify a content type")]
    MissingContentType { supported: Vec<String> },

    #[error("no acceptable encoder available")]
    UnacceptableRequest {
        supported: Vec<String>,
        accepted: Vec<String>,
    },

    #[error("request body could not be decoded")]
    MalformedBody { content_type: String, reason: String },

    #[error("{reason}")]
    Pagination { reason: String },

    #[error("no such element {resource}")]
    MissingResource { resource: String },

    #[error("duplicate element")]
    DuplicateElement { identifier: String },

    #[error("attribute value update not allowed, update aborted")]
    AttributeValueUpdate {
        attribute: String,
        new_value: Value,
        current_value: Option<Value>,
    },

    #[error("created element does not match its identifier")]
    IdentifierMismatch { expected: String, actual: String },

    #[error("missing element state")]
    MissingAttribute { attribute: String },

    #[error("invalid element state")]
    InvalidElementState {
        attribute: String,
        expected: Value,
        actual: Option<Value>,
    },

    #[error("invalid attribute value")]
    InvalidAttributeValue {
        attribute: Option<String>,
        reason: String,
    },

    #[error("method not allowed")]
    MethodNotAllowed {
        method: String,
        allowed: Vec<&'static str>,
    },

    /// Anything outside the taxonomy. Carries no details.
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    pub fn pagination(reason: impl Into<String>) -> Self {
        Self::Pagination {
            reason: reason.into(),
        }
    }

    pub fn missing(resource: impl Into<String>) -> Self {
        Self::MissingResource {
            resource: resource.into(),
        }
    }
}

impl SerializableError for ApiError {
    fn response_code(&self) -> u16 {
        match self {
            Self::UnsupportedContentType { .. } | Self::MissingContentType { .. } => 415,
            Self::UnacceptableRequest { .. } => 406,
            Self::MalformedBody { .. } | Self::Pagination { .. } => 400,
            Self::MissingResource { .. } => 404,
            Self::DuplicateElement { .. }
            | Self::AttributeValueUpdate { .. }
            | Self::IdentifierMismatch { .. }
            | Self::MissingAttribute { .. }
            | Self::InvalidElementState { .. }
            | Self::InvalidAttributeValue { .. } => 403,
            Self::MethodNotAllowed { .. } => 405,
            Self::Internal => 500,
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }

    fn details(&self) -> Map<String, Value> {
        let mut details = Map::new();
        let mut put = |key: &str, value: Value| {
            details.insert(key.to_owned(), value);
        };
        match self {
            Self::UnsupportedContentType {
                supported,
                provided,
            } => {
                put("supportedContentTypes", json!(supported));
                put("providedContentType", json!(provided));
            }
            Self::MissingContentType { supported } => {
                put("supportedContentTypes", json!(supported));
            }
            Self::UnacceptableRequest {
                supported,
                accepted,
            } => {
                put("supportedContentTypes", json!(supported));
                put("acceptedContentTypes", json!(accepted));
            }
            Self::MalformedBody {
                content_type,
                reason,
            } => {
                put("contentType", json!(content_type));
                put("reason", json!(reason));
            }
            Self::Pagination { .. } | Self::Internal => {}
            Self::MissingResource { resource } => {
                put("element", json!(resource));
            }
            Self::DuplicateElement { identifier } => {
                put("identifier", json!(identifier));
            }
            Self::AttributeValueUpdate {
                attribute,
                new_value,
                current_value,
            } => {
                put("attribute", json!(attribute));
                put("newValue", new_value.clone());
                if let Some(current) = current_value {
                    put("currentValue", current.clone());
                }
            }
            Self::IdentifierMismatch { expected, actual } => {
                put("expectedIdentifier", json!(expected));
                put("actualIdentifier", json!(actual));
            }
            Self::MissingAttribute { attribute } => {
                put("attribute", json!(attribute));
            }
            Self::InvalidElementState {
                attribute,
                expected,
                actual,
            } => {
                put("attribute", json!(attribute));
                put("expectedValue", expected.clone());
                if let Some(actual) = actual {
                    put("actualValue", actual.clone());
                }
            }
            Self::InvalidAttributeValue { attribute, reason } => {
                if let Some(attribute) = attribute {
                    put("attribute", json!(attribute));
                }
                put("reason", json!(reason));
            }
            Self::MethodNotAllowed { method, allowed } => {
                put("method", json!(method));
                put("allowedMethods", json!(allowed));
            }
        }
        details
    }
}

impl From<ElementError> for ApiError {
    fn from(err: ElementError) -> Self {
        match err {
            ElementError::MissingAttribute { attribute } => Self::MissingAttribute { attribute },
            ElementError::InvalidElementState {
                attribute,
                expected,
                actual,
            } => Self::InvalidElementState {
                attribute,
                expected,
                actual,
            },
            ElementError::AttributeValueUpdate {
                attribute,
                new_value,
                current_value,
            } => Self::AttributeValueUpdate {
                attribute,
                new_value,
                current_value,
            },
            ElementError::InvalidAttributeValue { attribute, reason } => {
                Self::InvalidAttributeValue { attribute, reason }
            }
        }
    }
}

impl From<CollectionError> for ApiError {
    fn from(err: CollectionError) -> Self {
        match err {
            CollectionError::DuplicateElement { identifier } => {
                Self::DuplicateElement { identifier }
            }
            CollectionError::MissingElement { identifier } => Self::missing(identifier),
            CollectionError::MissingChild { identifier, child } => {
                Self::missing(format!("{identifier}/{child}"))
            }
            CollectionError::IdentifierMismatch { expected, actual } => {
                Self::IdentifierMismatch { expected, actual }
            }
            CollectionError::Element(e) => e.into(),
            CollectionError::Backend(reason) => {
                tracing::error!(%reason, "collection backend failure");
                Self::Internal
            }
        }
    }
}

/// Result alias for protocol operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::MissingContentType { supported: vec![] }.response_code(), 415);
        assert_eq!(
            ApiError::UnacceptableRequest {
                supported: vec![],
                accepted: vec![]
            }
            .response_code(),
            406
        );
        assert_eq!(ApiError::pagination("x").response_code(), 400);
        assert_eq!(ApiError::missing("x").response_code(), 404);
        assert_eq!(
            ApiError::DuplicateElement {
                identifier: "x".into()
            }
            .response_code(),
            403
        );
        assert_eq!(ApiError::Internal.response_code(), 500);
    }

    #[test]
    fn exposed_attribute_update_error_includes_current_value() {
        let err = ApiError::AttributeValueUpdate {
            attribute: "maximumOccupancy".into(),
            new_value: json!(200),
            current_value: Some(json!(100)),
        };
        assert_eq!(
            Value::Object(err.details()),
            json!({"attribute": "maximumOccupancy", "newValue": 200, "currentValue": 100})
        );
    }

    #[test]
    fn hidden_attribute_update_error_omits_current_value() {
        let err: ApiError = ElementError::AttributeValueUpdate {
            attribute: "combination".into(),
            new_value: json!("0000"),
            current_value: None,
        }
        .into();
        let details = err.details();
        assert!(!details.contains_key("currentValue"));
        assert_eq!(details["newValue"], json!("0000"));
    }

    #[test]
    fn body_shape() {
        let body = ApiError::missing("Nala").to_body().to_value().unwrap();
        assert_eq!(
            body,
            json!({"errorMessage": "no such element Nala", "errorDetails": {"element": "Nala"}})
        );
    }

    #[test]
    fn backend_failures_hide_details() {
        let err: ApiError = CollectionError::Backend("disk on fire".into()).into();
        assert_eq!(err, ApiError::Internal);
        assert!(err.details().is_empty());
    }

    #[test]
    fn collection_errors_map_to_taxonomy() {
        let err: ApiError = CollectionError::MissingChild {
            identifier: "savanna".into(),
            child: "keepers".into(),
        }
        .into();
        assert_eq!(err, ApiError::missing("savanna/keepers"));

        let err: ApiError = CollectionError::IdentifierMismatch {
            expected: "south".into(),
            actual: "north".into(),
        }
        .into();
        assert_eq!(err.response_code(), 403);
    }
}
