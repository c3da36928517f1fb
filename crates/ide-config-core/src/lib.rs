//! # ide-config-core
//!
//! Domain types for the layered UI configuration of the embedded IDE.
//!
//! A configuration is resolved from three layers, lowest precedence first:
//!
//! 1. the built-in `default` profile;
//! 2. the profile of the selected style (`minimal`, `electron`, ...), which
//!    replaces the `styleOptions` and `appOptions` sections;
//! 3. overrides read from the query string and persisted storage.
//!
//! This crate holds the parts of that model that need no I/O: the profiles,
//! the Legal Values Table, dotted key-path helpers and the typed
//! [`Configuration`] with its validating write contract.  The `ide-config`
//! crate wires it to storage and query-string readers.

pub mod domain;

pub use domain::configuration::{AppOption, ConfigPath, Configuration, StyleFlag, WriteOutcome};
pub use domain::keypath::{
    key_paths, lookup, map_key_paths, merge, normalize_bool, KeyPathWrite, KeyPaths,
};
pub use domain::legal::{is_legal, legal_values};
pub use domain::profile::{
    AppOptions, AssistantLayout, IoLayout, ParseNameError, Profile, Style, StyleOptions, Theme,
    DEFAULT_PROFILE,
};
