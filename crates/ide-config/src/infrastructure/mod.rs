//! Infrastructure layer of the configuration store.
//!
//! Contains the I/O-facing adapters: key-value storage backends, the
//! namespaced persisted store built on them, the URL query reader and the
//! settings file of the command-line tool.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `ide_config_core`, but MUST NOT be imported by the `application` layer.

pub mod query;
pub mod storage;
