use std::sync::Arc;

use serde_json::Value;

use crate::error::CodecError;

/// Default content type for requests and responses.
pub const JSON: &str = "application/json";

/// Turns a value tree into response bytes.
pub trait Encoder: Send + Sync {
    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError>;
}

/// Turns request bytes into a value tree.
pub trait Decoder: Send + Sync {
    fn decode(&self, body: &[u8]) -> Result<Value, CodecError>;
}

/// JSON codec backed by `serde_json`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl Encoder for JsonCodec {
    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(|e| CodecError::Encode(e.to_string()))
    }
}

impl Decoder for JsonCodec {
    fn decode(&self, body: &[u8]) -> Result<Value, CodecError> {
        serde_json::from_slice(body).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

/// Ordered content-type → codec table.
///
/// Content types are stored lower case. Registering a type again replaces
/// its codec in place, keeping its position.
pub struct Registry<C: ?Sized> {
    entries: Vec<(String, Arc<C>)>,
}

impl<C: ?Sized> Registry<C> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add or replace the codec for `content_type`.
    pub fn register(&mut self, content_type: &str, codec: Arc<C>) {
        let content_type = content_type.to_ascii_lowercase();
        match self.entries.iter_mut().find(|(ct, _)| *ct == content_type) {
            Some(entry) => entry.1 = codec,
            None => self.entries.push((content_type, codec)),
        }
    }

    /// Builder form of [`register`](Registry::register).
    pub fn with(mut self, content_type: &str, codec: Arc<C>) -> Self {
        self.register(content_type, codec);
        self
    }

    /// Codec for an already-normalized content type.
    pub fn get(&self, content_type: &str) -> Option<&Arc<C>> {
        self.entries
            .iter()
            .find(|(ct, _)| ct == content_type)
            .map(|(_, codec)| codec)
    }

    /// Registered content types, in registration order.
    pub fn content_types(&self) -> Vec<String> {
        self.entries.iter().map(|(ct, _)| ct.clone()).collect()
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&str, &Arc<C>)> {
        self.entries.iter().map(|(ct, codec)| (ct.as_str(), codec))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C: ?Sized> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> Clone for Registry<C> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<C: ?Sized> std::fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.iter().map(|(ct, _)| ct)).finish()
    }
}

pub type EncoderRegistry = Registry<dyn Encoder>;
pub type DecoderRegistry = Registry<dyn Decoder>;
