use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use corral_core::ExposedCollection;
use corral_protocol::Codecs;

/// Top-level collections, keyed by their first path segment.
#[derive(Clone, Default)]
pub struct Resources {
    collections: BTreeMap<String, Arc<dyn ExposedCollection>>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `collection` at `/<name>`, replacing anything already there.
    pub fn insert(&mut self, name: impl Into<String>, collection: Arc<dyn ExposedCollection>) {
        let name = name.into();
        if self.collections.insert(name.clone(), collection).is_some() {
            tracing::warn!(%name, "replaced mounted collection");
        }
    }

    pub fn with(mut self, name: impl Into<String>, collection: Arc<dyn ExposedCollection>) -> Self {
        self.insert(name, collection);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ExposedCollection>> {
        self.collections.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

impl fmt::Debug for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Shared state handed to every request.
#[derive(Clone, Debug)]
pub struct AppState {
    pub resources: Arc<Resources>,
    pub codecs: Arc<Codecs>,
    pub public_host: Option<String>,
}

impl AppState {
    pub fn new(resources: Resources, codecs: Codecs) -> Self {
        Self {
            resources: Arc::new(resources),
            codecs: Arc::new(codecs),
            public_host: None,
        }
    }

    pub fn with_public_host(mut self, host: Option<String>) -> Self {
        self.public_host = host;
        self
    }
}
