//! Wire protocol for Corral REST collections.
//!
//! Covers everything between raw HTTP and a collection: parsing `Accept`
//! headers, choosing codecs, turning `start`/`stop` query parameters into
//! page bounds and links, and the error taxonomy rendered as response bodies.

pub mod accept;
pub mod codec;
pub mod error;
pub mod negotiation;
pub mod pagination;

pub use accept::{parse_accept, MediaRange};
pub use codec::{Decoder, DecoderRegistry, Encoder, EncoderRegistry, JsonCodec, Registry, JSON};
pub use error::{ApiError, ApiResult, CodecError, ErrorBody, SerializableError};
pub use negotiation::{Codecs, Negotiated};
pub use pagination::{parse_bounds, Page};
