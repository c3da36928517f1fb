//! ResolveConfigUseCase: the Configuration Store.
//!
//! [`ConfigStore`] owns the two memoized values of the configuration system:
//!
//! - the **Loaded Configuration**, a flat map from key-path to raw override,
//!   built once from the query string and persisted storage;
//! - the **Resolved Configuration**, a [`Configuration`] seeded from the
//!   `default` profile with the Loaded Configuration merged on top.
//!
//! Both are built lazily on first access and then live as long as the store.
//! The store is an explicit context object: construct one at startup and hand
//! it to whatever needs configuration access.
//!
//! # Precedence (lowest first)
//!
//! ```text
//! default profile  ─►  style profile (styleOptions, appOptions)  ─►  persisted  ─►  query string
//! ```
//!
//! # Style cascade
//!
//! Writing a new `style` replaces `styleOptions` and `appOptions` with the
//! named profile's sections and then re-merges the Loaded Configuration, so
//! explicit overrides survive a style switch.
//!
//! # Errors
//!
//! None of the public operations fail.  Rejected writes keep the previous
//! value; storage failures are swallowed by the [`PersistedStore`]
//! implementation.

use std::cell::OnceCell;

use ide_config_core::{
    key_paths, merge, Configuration, KeyPathWrite, WriteOutcome, DEFAULT_PROFILE,
};
use serde_json::{Map, Value};
use tracing::debug;

/// Prefix prepended to a key-path when looking it up in the query string.
pub const DEFAULT_QUERY_PREFIX: &str = "config.";

/// Persisted key-value storage for overrides.
///
/// Implementations must never fail: an unavailable or broken store behaves
/// as empty and ignores writes.
#[cfg_attr(test, mockall::automock)]
pub trait PersistedStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;
    /// Stores `value` under `key`.
    fn set(&mut self, key: &str, value: &Value);
    /// Removes `key`.
    fn delete(&mut self, key: &str);
}

/// Read-only access to the query string of the current page or invocation.
#[cfg_attr(test, mockall::automock)]
pub trait QueryReader {
    /// Returns the decoded value of the first parameter named `key`.
    fn get(&self, key: &str) -> Option<String>;
    /// Returns every parameter name, in order of appearance.
    fn keys(&self) -> Vec<String>;
}

impl<T: PersistedStore + ?Sized> PersistedStore for Box<T> {
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &Value) {
        (**self).set(key, value)
    }

    fn delete(&mut self, key: &str) {
        (**self).delete(key)
    }
}

impl<T: QueryReader + ?Sized> QueryReader for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

/// The Configuration Store.
pub struct ConfigStore<S, Q> {
    storage: S,
    query: Q,
    query_prefix: String,
    loaded: OnceCell<Map<String, Value>>,
    resolved: Option<Configuration>,
}

impl<S: PersistedStore, Q: QueryReader> ConfigStore<S, Q> {
    /// Creates a store reading overrides from `storage` and `query`.
    ///
    /// Nothing is read until the first access.
    pub fn new(storage: S, query: Q) -> Self {
        Self {
            storage,
            query,
            query_prefix: DEFAULT_QUERY_PREFIX.to_string(),
            loaded: OnceCell::new(),
            resolved: None,
        }
    }

    /// Overrides the query-string prefix (default [`DEFAULT_QUERY_PREFIX`]).
    pub fn with_query_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.query_prefix = prefix.into();
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Returns the Resolved Configuration, building it on first call.
    ///
    /// Later calls return the same instance without re-merging.
    pub fn get_config(&mut self) -> &Configuration {
        let (config, _) = self.parts();
        config
    }

    /// Returns the value at `key_path`.
    ///
    /// Falls back to the persisted value when the Resolved Configuration has
    /// nothing at that path.
    pub fn get(&mut self, key_path: &str) -> Option<Value> {
        let resolved = self.get_config().get(key_path);
        resolved.or_else(|| self.storage.get(key_path))
    }

    /// Writes `value` at `key_path` and returns the value actually stored.
    ///
    /// A rejected write returns the previous value (`Value::Null` when there
    /// was none).  With `persist`, the resulting value is also written to
    /// persisted storage under `key_path`.
    pub fn set(&mut self, key_path: &str, value: Value, persist: bool) -> Value {
        self.set_with_outcome(key_path, value, persist).0
    }

    /// Like [`set`](Self::set), also reporting how the write was handled.
    pub fn set_with_outcome(
        &mut self,
        key_path: &str,
        value: Value,
        persist: bool,
    ) -> (Value, WriteOutcome) {
        let (config, loaded) = self.parts();
        let outcome = write_resolved(config, loaded, key_path, value);
        let stored = config.get(key_path);

        if persist {
            if let Some(value) = &stored {
                self.storage.set(key_path, value);
            }
        }
        (stored.unwrap_or(Value::Null), outcome)
    }

    /// Returns the Loaded Configuration, building it on first call.
    ///
    /// For every leaf key-path `k` of the `default` profile the query string
    /// is consulted under `prefix + k`, then persisted storage under `k`.
    /// Only non-empty values are kept.
    pub fn loaded_config(&self) -> &Map<String, Value> {
        self.loaded
            .get_or_init(|| build_loaded(&self.storage, &self.query, &self.query_prefix))
    }

    /// Returns query parameters that carry the query prefix but name no
    /// key-path of the profile shape; they are never applied.
    pub fn unknown_query_keys(&self) -> Vec<String> {
        let shape = DEFAULT_PROFILE.to_value();
        let known: Vec<String> = key_paths(&shape, "").collect();

        self.query
            .keys()
            .into_iter()
            .filter(|key| {
                key.strip_prefix(self.query_prefix.as_str())
                    .map(|path| !known.iter().any(|k| k == path))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Splits the store into the Resolved Configuration and the Loaded
    /// Configuration, building both if needed.
    fn parts(&mut self) -> (&mut Configuration, &Map<String, Value>) {
        let loaded = self
            .loaded
            .get_or_init(|| build_loaded(&self.storage, &self.query, &self.query_prefix));
        let config = match self.resolved.take() {
            Some(config) => config,
            None => resolve(loaded),
        };
        (self.resolved.insert(config), loaded)
    }
}

/// Seeds a configuration from the `default` profile and merges `loaded`.
fn resolve(loaded: &Map<String, Value>) -> Configuration {
    let mut config = Configuration::from_profile(&DEFAULT_PROFILE);
    merge(&mut Resolving { config: &mut config, loaded }, loaded);
    debug!(overrides = loaded.len(), style = %config.style(), "resolved configuration");
    config
}

fn build_loaded<S, Q>(storage: &S, query: &Q, prefix: &str) -> Map<String, Value>
where
    S: PersistedStore + ?Sized,
    Q: QueryReader + ?Sized,
{
    let shape = DEFAULT_PROFILE.to_value();
    let mut loaded = Map::new();

    for key_path in key_paths(&shape, "") {
        let from_query = query
            .get(&format!("{prefix}{key_path}"))
            .map(Value::String)
            .filter(is_present);
        let value = from_query.or_else(|| storage.get(&key_path).filter(is_present));

        if let Some(value) = value {
            debug!(%key_path, %value, "loaded override");
            loaded.insert(key_path, value);
        }
    }
    loaded
}

/// `null` and `""` count as absent.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Validating writer used for every write to the Resolved Configuration.
struct Resolving<'a> {
    config: &'a mut Configuration,
    loaded: &'a Map<String, Value>,
}

impl KeyPathWrite for Resolving<'_> {
    fn write_path(&mut self, key_path: &str, value: Value) {
        write_resolved(self.config, self.loaded, key_path, value);
    }
}

/// Assigns `value` and performs the style cascade when `style` changes.
fn write_resolved(
    config: &mut Configuration,
    loaded: &Map<String, Value>,
    key_path: &str,
    value: Value,
) -> WriteOutcome {
    let outcome = config.assign(key_path, value);
    if let WriteOutcome::StyleChanged(style) = outcome {
        debug!(%style, "cascading style profile");
        config.apply_style_sections(style);
        merge(&mut Resolving { config, loaded }, loaded);
    }
    outcome
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ide_config_core::domain::profile::{IoLayout, MINIMAL_PROFILE};
    use ide_config_core::{Style, Theme};
    use mockall::predicate::eq;
    use serde_json::json;

    fn empty_storage() -> MockPersistedStore {
        let mut storage = MockPersistedStore::new();
        storage.expect_get().returning(|_| None);
        storage
    }

    fn empty_query() -> MockQueryReader {
        let mut query = MockQueryReader::new();
        query.expect_get().returning(|_| None);
        query
    }

    fn query_with(pairs: &'static [(&'static str, &'static str)]) -> MockQueryReader {
        let mut query = MockQueryReader::new();
        query.expect_get().returning(move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        });
        query
    }

    fn storage_with(entries: &'static [(&'static str, &'static str)]) -> MockPersistedStore {
        let mut storage = MockPersistedStore::new();
        storage.expect_get().returning(move |key| {
            entries
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| Value::String(v.to_string()))
        });
        storage
    }

    // ── Construction ──────────────────────────────────────────────────────────

    #[test]
    fn test_get_config_reads_each_source_once() {
        // Arrange: 13 leaf key-paths, each looked up exactly once.
        let mut query = MockQueryReader::new();
        query.expect_get().times(13).returning(|_| None);
        let mut storage = MockPersistedStore::new();
        storage.expect_get().times(13).returning(|_| None);
        let mut store = ConfigStore::new(storage, query);

        // Act
        store.get_config();
        store.get_config();
        store.loaded_config();

        // Assert: mock expectations are verified on drop.
    }

    #[test]
    fn test_get_config_returns_same_instance() {
        let mut store = ConfigStore::new(empty_storage(), empty_query());

        let first: *const Configuration = store.get_config();
        store.set("theme", json!("dark"), false);
        let second: *const Configuration = store.get_config();

        assert_eq!(first, second);
        assert_eq!(store.get_config().theme(), Theme::Dark);
    }

    #[test]
    fn test_query_prefix_is_applied() {
        // Arrange
        let query = query_with(&[("config.theme", "light"), ("theme", "dark")]);
        let store = ConfigStore::new(empty_storage(), query);

        // Act
        let loaded = store.loaded_config();

        // Assert
        assert_eq!(loaded.get("theme"), Some(&json!("light")));
    }

    #[test]
    fn test_custom_query_prefix() {
        let query = query_with(&[("ide.theme", "light")]);
        let store = ConfigStore::new(empty_storage(), query).with_query_prefix("ide.");

        assert_eq!(store.loaded_config().get("theme"), Some(&json!("light")));
    }

    #[test]
    fn test_empty_query_value_falls_back_to_storage() {
        let query = query_with(&[("config.theme", "")]);
        let storage = storage_with(&[("theme", "dark")]);
        let store = ConfigStore::new(storage, query);

        assert_eq!(store.loaded_config().get("theme"), Some(&json!("dark")));
    }

    #[test]
    fn test_loaded_config_ignores_keys_outside_profile_shape() {
        let query = query_with(&[("config.editor.fontSize", "14")]);
        let store = ConfigStore::new(empty_storage(), query);

        assert!(store.loaded_config().is_empty());
    }

    #[test]
    fn test_invalid_loaded_value_is_clamped() {
        let query = query_with(&[("config.theme", "sepia"), ("config.styleOptions.showLogo", "no")]);
        let mut store = ConfigStore::new(empty_storage(), query);

        let config = store.get_config();

        assert_eq!(config.theme(), Theme::System);
        assert!(!config.style_options().show_logo);
    }

    #[test]
    fn test_unknown_query_keys_lists_only_prefixed_unknown_paths() {
        // Arrange
        let mut query = MockQueryReader::new();
        query.expect_keys().returning(|| {
            vec![
                "config.theme".to_string(),
                "config.appOptions.ioLayot".to_string(),
                "utm_source".to_string(),
            ]
        });
        let store = ConfigStore::new(empty_storage(), query);

        // Act
        let unknown = store.unknown_query_keys();

        // Assert
        assert_eq!(unknown, ["config.appOptions.ioLayot"]);
    }

    // ── get / set ─────────────────────────────────────────────────────────────

    #[test]
    fn test_get_falls_back_to_storage() {
        // Arrange
        let mut storage = MockPersistedStore::new();
        storage
            .expect_get()
            .with(eq("recentFiles"))
            .returning(|_| Some(json!(["a.py", "b.py"])));
        storage.expect_get().returning(|_| None);
        let mut store = ConfigStore::new(storage, empty_query());

        // Act / Assert
        assert_eq!(store.get("recentFiles"), Some(json!(["a.py", "b.py"])));
        assert_eq!(store.get("nothing.here"), None);
        assert_eq!(store.get("style"), Some(json!("default")));
    }

    #[test]
    fn test_set_rejected_returns_previous_value() {
        let mut store = ConfigStore::new(empty_storage(), empty_query());

        let (value, outcome) = store.set_with_outcome("theme", json!("sepia"), false);

        assert_eq!(value, json!("system"));
        assert_eq!(outcome, WriteOutcome::Rejected);
    }

    #[test]
    fn test_set_with_persist_writes_resulting_value() {
        // Arrange
        let mut storage = empty_storage();
        storage
            .expect_set()
            .with(eq("appOptions.ioLayout"), eq(json!("column")))
            .times(1)
            .return_const(());
        let mut store = ConfigStore::new(storage, empty_query());

        // Act
        let value = store.set("appOptions.ioLayout", json!("column"), true);

        // Assert
        assert_eq!(value, json!("column"));
    }

    #[test]
    fn test_set_without_persist_does_not_touch_storage() {
        let mut storage = empty_storage();
        storage.expect_set().never();
        let mut store = ConfigStore::new(storage, empty_query());

        store.set("theme", json!("light"), false);
    }

    // ── Style cascade ─────────────────────────────────────────────────────────

    #[test]
    fn test_style_cascade_keeps_loaded_overrides() {
        // Arrange
        let storage = storage_with(&[("appOptions.ioLayout", "column")]);
        let mut store = ConfigStore::new(storage, empty_query());

        // Act
        store.set("style", json!("minimal"), false);

        // Assert
        let app = store.get_config().app_options();
        assert_eq!(app.io_layout, IoLayout::Column);
        assert_eq!(app.assistant_layout, MINIMAL_PROFILE.app_options.assistant_layout);
        assert_eq!(app.show_toolbar, MINIMAL_PROFILE.app_options.show_toolbar);
        assert_eq!(
            store.get_config().style_options(),
            &MINIMAL_PROFILE.style_options
        );
    }

    #[test]
    fn test_loaded_style_applies_its_profile() {
        let query = query_with(&[("config.style", "minimal")]);
        let mut store = ConfigStore::new(empty_storage(), query);

        let config = store.get_config();

        assert_eq!(config.style(), Style::Minimal);
        assert_eq!(config.app_options(), &MINIMAL_PROFILE.app_options);
    }

    #[test]
    fn test_loaded_style_wins_over_programmatic_style_switch() {
        // The cascade re-merges every loaded override, `style` included.
        let query = query_with(&[("config.style", "minimal")]);
        let mut store = ConfigStore::new(empty_storage(), query);

        let value = store.set("style", json!("electron"), false);

        assert_eq!(value, json!("minimal"));
        assert_eq!(store.get_config().app_options(), &MINIMAL_PROFILE.app_options);
    }

    #[test]
    fn test_setting_current_style_does_not_cascade() {
        // Arrange
        let mut store = ConfigStore::new(empty_storage(), empty_query());
        store.set("styleOptions.showLogo", json!(false), false);

        // Act
        let (_, outcome) = store.set_with_outcome("style", json!("default"), false);

        // Assert
        assert_eq!(outcome, WriteOutcome::Unchanged);
        assert!(!store.get_config().style_options().show_logo);
    }
}
