//! Resource-tree dispatch.
//!
//! A request path alternates collection and element segments:
//! `/<collection>/<id>/<child>/<id>/...`. The first segment names a mounted
//! collection, each following pair selects an element and one of its child
//! collections. Whatever the walk ends on handles the method.

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{Path, State as AppStateExtractor};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use url::Url;

use corral_core::{ExposedCollection, State};
use corral_protocol::{ApiError, ApiResult, Page};

use crate::response::{render_error, Reply};
use crate::state::{AppState, Resources};

const COLLECTION_METHODS: &[&str] = &["GET", "HEAD", "POST", "PUT"];
const ELEMENT_METHODS: &[&str] = &["GET", "HEAD", "PUT", "DELETE"];

/// Where a path walk ended.
enum Target {
    Collection(Arc<dyn ExposedCollection>),
    Element {
        collection: Arc<dyn ExposedCollection>,
        identifier: String,
    },
}

struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
}

impl Request {
    fn header(&self, name: impl header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Handle any request below the root.
///
/// `Accept` is consulted only when there is a body to encode, so a change
/// that replies with a bare status is applied whatever the client accepts.
/// Errors fall back to the default encoder when `Accept` cannot be met.
/// `HEAD` is answered as `GET` without the body.
pub async fn dispatch(
    AppStateExtractor(app): AppStateExtractor<AppState>,
    path: Option<Path<String>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = Request {
        method,
        uri,
        headers,
        body,
    };
    let path = path.map(|Path(path)| path).unwrap_or_default();
    let accept = request.header(header::ACCEPT);
    let response = match handle(&app, &path, &request).await {
        Ok(Reply::Empty(status)) => status.into_response(),
        Ok(reply) => match app.codecs.resolve_encoder(accept) {
            Ok(encoder) => reply.render(&encoder),
            Err(err) => render_error(&err, &app.codecs.default_encoder()),
        },
        Err(err) => {
            let encoder = app
                .codecs
                .resolve_encoder(accept)
                .unwrap_or_else(|_| app.codecs.default_encoder());
            render_error(&err, &encoder)
        }
    };
    if request.method == Method::HEAD {
        let (parts, _) = response.into_parts();
        return Response::from_parts(parts, Body::empty());
    }
    response
}

async fn handle(app: &AppState, path: &str, request: &Request) -> ApiResult<Reply> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match resolve(&app.resources, &segments).await? {
        Target::Collection(collection) => {
            collection_request(app, request, collection.as_ref()).await
        }
        Target::Element {
            collection,
            identifier,
        } => element_request(app, request, collection.as_ref(), &identifier).await,
    }
}

async fn resolve(resources: &Resources, segments: &[&str]) -> ApiResult<Target> {
    let Some((first, rest)) = segments.split_first() else {
        return Err(ApiError::missing("/"));
    };
    let mut collection = resources.get(first).ok_or_else(|| ApiError::missing(*first))?;
    let mut rest = rest.iter();
    loop {
        let Some(identifier) = rest.next() else {
            return Ok(Target::Collection(collection));
        };
        let Some(child) = rest.next() else {
            return Ok(Target::Element {
                collection,
                identifier: (*identifier).to_owned(),
            });
        };
        tracing::debug!(%identifier, %child, "descending into child collection");
        collection = collection.child(identifier, child).await?;
    }
}

async fn collection_request(
    app: &AppState,
    request: &Request,
    collection: &dyn ExposedCollection,
) -> ApiResult<Reply> {
    match request.method {
        Method::GET | Method::HEAD => {
            let base = request_url(app, request)?;
            let query: Vec<(String, String)> = base.query_pairs().into_owned().collect();
            let page = Page::from_query(&base, &query, &collection.config())?;
            let results = collection.query_states(page.start, page.stop).await?;
            let page = page.finish(results.len());
            tracing::debug!(
                start = page.start,
                stop = page.stop,
                returned = results.len(),
                "listing collection"
            );
            Ok(Reply::Encoded(
                StatusCode::OK,
                json!({
                    "results": results,
                    "prev": page.prev,
                    "next": page.next,
                }),
            ))
        }
        Method::POST | Method::PUT => {
            let state = decode(app, request)?;
            collection.create(state).await?;
            Ok(Reply::Empty(StatusCode::CREATED))
        }
        _ => Err(not_allowed(&request.method, COLLECTION_METHODS)),
    }
}

async fn element_request(
    app: &AppState,
    request: &Request,
    collection: &dyn ExposedCollection,
    identifier: &str,
) -> ApiResult<Reply> {
    match request.method {
        Method::GET | Method::HEAD => {
            let state = collection.element_state(identifier).await?;
            Ok(Reply::Encoded(StatusCode::OK, Value::Object(state)))
        }
        Method::PUT => {
            let state = decode(app, request)?;
            if collection.contains(identifier).await? {
                collection.update_element(identifier, state).await?;
                Ok(Reply::Empty(StatusCode::OK))
            } else {
                collection.create_at(identifier, state).await?;
                Ok(Reply::Empty(StatusCode::CREATED))
            }
        }
        Method::DELETE => {
            collection.remove_element(identifier).await?;
            Ok(Reply::Empty(StatusCode::NO_CONTENT))
        }
        _ => Err(not_allowed(&request.method, ELEMENT_METHODS)),
    }
}

fn decode(app: &AppState, request: &Request) -> ApiResult<State> {
    let decoder = app
        .codecs
        .resolve_decoder(request.header(header::CONTENT_TYPE))?;
    decoder.decode_state(&request.body)
}

fn not_allowed(method: &Method, allowed: &[&'static str]) -> ApiError {
    ApiError::MethodNotAllowed {
        method: method.to_string(),
        allowed: allowed.to_vec(),
    }
}

/// The absolute URL of this request, as the client addressed it.
///
/// Scheme comes from `X-Forwarded-Proto` (default `http`); host from the
/// configured public host, else the `Host` header.
fn request_url(app: &AppState, request: &Request) -> ApiResult<Url> {
    let scheme = request.header("x-forwarded-proto").unwrap_or("http");
    let host = app
        .public_host
        .as_deref()
        .or_else(|| request.header(header::HOST))
        .unwrap_or("localhost");
    let path_and_query = request
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    Url::parse(&format!("{scheme}://{host}{path_and_query}")).map_err(|e| {
        tracing::warn!(%scheme, %host, error = %e, "cannot rebuild request URL");
        ApiError::Internal
    })
}
