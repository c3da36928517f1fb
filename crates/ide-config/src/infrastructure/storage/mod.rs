//! Persisted overrides and tool settings.

pub mod backend;
pub mod persisted;
pub mod settings;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend, StorageError};
pub use persisted::{NamespacedStore, DEFAULT_NAMESPACE};
pub use settings::{load_settings, save_settings, Settings, SettingsError};
