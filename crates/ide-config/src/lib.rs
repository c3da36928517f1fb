//! ide-config library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # Layers
//!
//! - **`application`** – the [`ConfigStore`](application::resolve_config::ConfigStore)
//!   that memoizes the Resolved and Loaded Configurations, plus the
//!   `PersistedStore` and `QueryReader` ports it depends on.
//! - **`infrastructure`** – adapters for those ports (namespaced key-value
//!   storage in memory or in a JSON file, URL query strings) and the TOML
//!   settings file of the command-line tool.

pub mod application;
pub mod infrastructure;
