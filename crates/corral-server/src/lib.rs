//! HTTP resource adapter for Corral.
//!
//! Mounts [`ExposedCollection`](corral_core::ExposedCollection)s under path
//! segments and serves them over axum:
//!
//! | path                 | method       | result                     |
//! |----------------------|--------------|----------------------------|
//! | `/<collection>`      | `GET`        | page of listing states     |
//! | `/<collection>`      | `POST`/`PUT` | create, 201                |
//! | `/<collection>/<id>` | `GET`        | element state              |
//! | `/<collection>/<id>` | `PUT`        | update (200) or create (201) |
//! | `/<collection>/<id>` | `DELETE`     | remove, 204                |
//!
//! Child collections continue the path: `/<collection>/<id>/<child>/...`.
//! Response encoders are negotiated from `Accept`, request decoders from
//! `Content-Type`. Failures render as `{"errorMessage", "errorDetails"}`.

pub mod config;
pub mod error;
pub mod resource;
pub mod response;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::build_router;
pub use server::CorralServer;
pub use state::{AppState, Resources};
