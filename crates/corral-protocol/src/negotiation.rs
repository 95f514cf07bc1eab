//! Picking an encoder from `Accept` and a decoder from `Content-Type`.

use std::sync::Arc;

use serde_json::Value;

use crate::accept::{essence, parse_accept};
use crate::codec::{Decoder, DecoderRegistry, Encoder, EncoderRegistry, JsonCodec, JSON};
use crate::error::{ApiError, ApiResult};

/// A codec together with the content type it was selected for.
pub struct Negotiated<C: ?Sized> {
    pub content_type: String,
    pub codec: Arc<C>,
}

impl<C: ?Sized> Clone for Negotiated<C> {
    fn clone(&self) -> Self {
        Self {
            content_type: self.content_type.clone(),
            codec: Arc::clone(&self.codec),
        }
    }
}

impl<C: ?Sized> std::fmt::Debug for Negotiated<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Negotiated")
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// The encoder and decoder tables of one resource adapter.
///
/// The default content type always has both an encoder and a decoder, so
/// error rendering can fall back to it when negotiation fails.
#[derive(Clone, Debug)]
pub struct Codecs {
    encoders: EncoderRegistry,
    decoders: DecoderRegistry,
    default: Negotiated<dyn Encoder>,
}

impl Codecs {
    /// Tables holding only the default codec pair.
    pub fn new(
        default_content_type: &str,
        encoder: Arc<dyn Encoder>,
        decoder: Arc<dyn Decoder>,
    ) -> Self {
        let content_type = default_content_type.to_ascii_lowercase();
        Self {
            encoders: EncoderRegistry::new().with(&content_type, encoder.clone()),
            decoders: DecoderRegistry::new().with(&content_type, decoder),
            default: Negotiated {
                content_type,
                codec: encoder,
            },
        }
    }

    /// JSON only.
    pub fn json() -> Self {
        Self::new(JSON, Arc::new(JsonCodec), Arc::new(JsonCodec))
    }

    /// Register another encoder.
    pub fn with_encoder(mut self, content_type: &str, encoder: Arc<dyn Encoder>) -> Self {
        self.encoders.register(content_type, encoder);
        self
    }

    /// Register another decoder.
    pub fn with_decoder(mut self, content_type: &str, decoder: Arc<dyn Decoder>) -> Self {
        self.decoders.register(content_type, decoder);
        self
    }

    pub fn default_content_type(&self) -> &str {
        &self.default.content_type
    }

    /// The encoder used when negotiation is impossible.
    pub fn default_encoder(&self) -> Negotiated<dyn Encoder> {
        self.default.clone()
    }

    pub fn encoders(&self) -> &EncoderRegistry {
        &self.encoders
    }

    pub fn decoders(&self) -> &DecoderRegistry {
        &self.decoders
    }

    /// Select the response encoder for an `Accept` header.
    ///
    /// Ranges are tried in client order; the first registered one wins.
    /// `*/*` selects the default type and `type/*` the first registered
    /// subtype. A missing header means the default type.
    pub fn resolve_encoder(&self, accept: Option<&str>) -> ApiResult<Negotiated<dyn Encoder>> {
        let Some(accept) = accept else {
            return Ok(self.default_encoder());
        };

        let accepted: Vec<String> = parse_accept(accept).iter().map(|r| r.normalized()).collect();
        for content_type in &accepted {
            if let Some(found) = self.match_encoder(content_type) {
                tracing::debug!(content_type = %found.content_type, "negotiated encoder");
                return Ok(found);
            }
        }

        tracing::debug!(?accepted, "no acceptable encoder");
        Err(ApiError::UnacceptableRequest {
            supported: self.encoders.content_types(),
            accepted,
        })
    }

    fn match_encoder(&self, content_type: &str) -> Option<Negotiated<dyn Encoder>> {
        if content_type == "*/*" {
            return Some(self.default_encoder());
        }
        if let Some(codec) = self.encoders.get(content_type) {
            return Some(Negotiated {
                content_type: content_type.to_owned(),
                codec: codec.clone(),
            });
        }
        let major = content_type.strip_suffix("/*")?;
        self.encoders
            .entries()
            .find(|(ct, _)| ct.split('/').next() == Some(major))
            .map(|(ct, codec)| Negotiated {
                content_type: ct.to_owned(),
                codec: codec.clone(),
            })
    }

    /// Select the request decoder for a `Content-Type` header.
    ///
    /// Parameters such as `charset` are ignored when matching.
    pub fn resolve_decoder(&self, content_type: Option<&str>) -> ApiResult<Negotiated<dyn Decoder>> {
        let Some(provided) = content_type else {
            return Err(ApiError::MissingContentType {
                supported: self.decoders.content_types(),
            });
        };

        let wanted = essence(provided);
        match self.decoders.get(&wanted) {
            Some(codec) => Ok(Negotiated {
                content_type: wanted,
                codec: codec.clone(),
            }),
            None => Err(ApiError::UnsupportedContentType {
                supported: self.decoders.content_types(),
                provided: provided.to_owned(),
            }),
        }
    }
}

impl Default for Codecs {
    fn default() -> Self {
        Self::json()
    }
}

impl Negotiated<dyn Decoder> {
    /// Decode a request body that must be an attribute map.
    pub fn decode_state(&self, body: &[u8]) -> ApiResult<corral_core::State> {
        let malformed = |reason: String| ApiError::MalformedBody {
            content_type: self.content_type.clone(),
            reason,
        };
        match self.codec.decode(body).map_err(|e| malformed(e.to_string()))? {
            Value::Object(state) => Ok(state),
            other => Err(malformed(format!(
                "expected an object, got {}",
                kind_of(&other)
            ))),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use serde_json::json;

    struct Plain;

    impl Encoder for Plain {
        fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
            Ok(value.to_string().into_bytes())
        }
    }

    fn codecs() -> Codecs {
        Codecs::json().with_encoder("text/plain", Arc::new(Plain))
    }

    #[test]
    fn missing_accept_uses_default() {
        let found = codecs().resolve_encoder(None).unwrap();
        assert_eq!(found.content_type, JSON);
    }

    #[test]
    fn first_registered_in_client_order_wins() {
        let found = codecs()
            .resolve_encoder(Some("text/html, text/plain;q=0.9, application/json"))
            .unwrap();
        assert_eq!(found.content_type, "text/plain");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let found = codecs().resolve_encoder(Some("Application/JSON")).unwrap();
        assert_eq!(found.content_type, JSON);
    }

    #[test]
    fn wildcards() {
        let c = codecs();
        assert_eq!(c.resolve_encoder(Some("*/*")).unwrap().content_type, JSON);
        assert_eq!(
            c.resolve_encoder(Some("text/*")).unwrap().content_type,
            "text/plain"
        );
    }

    #[test]
    fn unacceptable_lists_both_sides() {
        let err = codecs().resolve_encoder(Some("ZALGO/ZALGO")).unwrap_err();
        assert_eq!(
            err,
            ApiError::UnacceptableRequest {
                supported: vec![JSON.into(), "text/plain".into()],
                accepted: vec!["zalgo/zalgo".into()],
            }
        );
    }

    #[test]
    fn empty_accept_is_unacceptable() {
        assert!(matches!(
            codecs().resolve_encoder(Some("")),
            Err(ApiError::UnacceptableRequest { .. })
        ));
    }

    #[test]
    fn decoder_requires_content_type() {
        let err = codecs().resolve_decoder(None).unwrap_err();
        assert_eq!(
            err,
            ApiError::MissingContentType {
                supported: vec![JSON.into()]
            }
        );
    }

    #[test]
    fn decoder_rejects_unregistered_type() {
        let err = codecs().resolve_decoder(Some("ZALGO/ZALGO")).unwrap_err();
        assert_eq!(
            err,
            ApiError::UnsupportedContentType {
                supported: vec![JSON.into()],
                provided: "ZALGO/ZALGO".into(),
            }
        );
    }

    #[test]
    fn decoder_ignores_parameters() {
        let found = codecs()
            .resolve_decoder(Some("application/json; charset=utf-8"))
            .unwrap();
        assert_eq!(found.content_type, JSON);
    }

    #[test]
    fn decode_state_requires_object() {
        let decoder = codecs().resolve_decoder(Some(JSON)).unwrap();
        let state = decoder.decode_state(br#"{"color": "green"}"#).unwrap();
        assert_eq!(state["color"], json!("green"));

        let err = decoder.decode_state(b"[1, 2]").unwrap_err();
        assert!(matches!(err, ApiError::MalformedBody { .. }));
        let err = decoder.decode_state(b"{").unwrap_err();
        assert!(matches!(err, ApiError::MalformedBody { .. }));
    }
}
