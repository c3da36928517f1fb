//! Application layer of the configuration store.
//!
//! The single use case, **`resolve_config`**, layers the built-in profiles,
//! the selected style and the query-string/storage overrides into one
//! Resolved Configuration and keeps it consistent on every write.
//!
//! Like every use case here it depends only on traits
//! ([`PersistedStore`](resolve_config::PersistedStore),
//! [`QueryReader`](resolve_config::QueryReader)) and on `ide_config_core`
//! domain types.  Concrete storage and query readers are injected at
//! construction time.

pub mod resolve_config;
