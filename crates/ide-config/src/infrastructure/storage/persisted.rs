//! Namespaced persisted store.
//!
//! [`NamespacedStore`] implements the [`PersistedStore`] port on top of any
//! [`KeyValueBackend`]:
//!
//! - every key is prefixed with a namespace before it reaches the backend;
//! - strings are stored as-is, every other value as JSON text;
//! - reads parse JSON text back into a value and fall back to the raw string
//!   when it does not parse;
//! - backend failures are logged and swallowed, so reads return `None` and
//!   writes become no-ops.

use serde_json::Value;
use tracing::warn;

use super::backend::KeyValueBackend;
use crate::application::resolve_config::PersistedStore;

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "ide-config:";

/// A [`PersistedStore`] that namespaces keys and encodes values as text.
#[derive(Debug, Clone)]
pub struct NamespacedStore<B> {
    backend: B,
    namespace: String,
}

impl<B: KeyValueBackend> NamespacedStore<B> {
    pub fn new(backend: B, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    /// A store using [`DEFAULT_NAMESPACE`].
    pub fn with_default_namespace(backend: B) -> Self {
        Self::new(backend, DEFAULT_NAMESPACE)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{key}", self.namespace)
    }
}

impl<B: KeyValueBackend> PersistedStore for NamespacedStore<B> {
    fn get(&self, key: &str) -> Option<Value> {
        match self.backend.get_item(&self.namespaced(key)) {
            Ok(raw) => raw.map(decode),
            Err(e) => {
                warn!(key, "persisted read failed: {e}");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &Value) {
        let text = match encode(value) {
            Ok(text) => text,
            Err(e) => {
                warn!(key, "could not encode value for storage: {e}");
                return;
            }
        };
        if let Err(e) = self.backend.set_item(&self.namespaced(key), &text) {
            warn!(key, "persisted write failed: {e}");
        }
    }

    fn delete(&mut self, key: &str) {
        if let Err(e) = self.backend.remove_item(&self.namespaced(key)) {
            warn!(key, "persisted delete failed: {e}");
        }
    }
}

/// Encodes a value as storage text: strings raw, everything else as JSON.
pub fn encode(value: &Value) -> Result<String, serde_json::Error> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => serde_json::to_string(other),
    }
}

/// Decodes storage text, returning the raw text when it is not JSON.
pub fn decode(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
