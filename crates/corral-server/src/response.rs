//! Turning replies and errors into HTTP responses.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use corral_protocol::{ApiError, Encoder, Negotiated, SerializableError};

/// What a resource operation produced on success.
#[derive(Debug)]
pub enum Reply {
    /// A body to encode with the negotiated encoder.
    Encoded(StatusCode, Value),
    /// Status only; no body and no content type.
    Empty(StatusCode),
}

impl Reply {
    pub fn render(self, encoder: &Negotiated<dyn Encoder>) -> Response {
        match self {
            Self::Encoded(status, value) => encoded(status, encoder, &value),
            Self::Empty(status) => status.into_response(),
        }
    }
}

/// Render `err` as `{"errorMessage", "errorDetails"}` with `encoder`.
pub fn render_error(err: &ApiError, encoder: &Negotiated<dyn Encoder>) -> Response {
    let status =
        StatusCode::from_u16(err.response_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::error!(%status, "request failed");
    } else {
        tracing::warn!(%status, error = %err, "request rejected");
    }
    match err.to_body().to_value() {
        Ok(body) => encoded(status, encoder, &body),
        Err(e) => {
            tracing::error!(error = %e, "error body serialization failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn encoded(status: StatusCode, encoder: &Negotiated<dyn Encoder>, value: &Value) -> Response {
    let bytes = match encoder.codec.encode(value) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(
                content_type = %encoder.content_type,
                error = %e,
                "response encoding failed"
            );
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let mut response = (status, bytes).into_response();
    match HeaderValue::from_str(&encoder.content_type) {
        Ok(content_type) => {
            response.headers_mut().insert(header::CONTENT_TYPE, content_type);
        }
        Err(_) => {
            tracing::error!(
                content_type = %encoder.content_type,
                "content type is not a valid header value"
            );
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use corral_protocol::Codecs;

    #[test]
    fn empty_reply_has_no_content_type() {
        let response = Reply::Empty(StatusCode::CREATED).render(&Codecs::json().default_encoder());
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn errors_carry_status_and_content_type() {
        let response = render_error(&ApiError::missing("Ed"), &Codecs::json().default_encoder());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            HeaderValue::from_static("application/json")
        );
    }

    #[test]
    fn internal_errors_map_to_500() {
        let response = render_error(&ApiError::Internal, &Codecs::json().default_encoder());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
