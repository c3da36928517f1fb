//! Domain model of the configuration store.
//!
//! Everything here is pure: no storage, no query strings, no logging
//! subscriber.  The application layer in `ide-config` layers the persisted
//! and query-string overrides on top of these types.
//!
//! - **`profile`** – the five built-in profiles and their enums.
//! - **`legal`** – the partial whitelist consulted on every write.
//! - **`keypath`** – flattening, lookup, boolean normalisation and merge.
//! - **`configuration`** – the typed Resolved Configuration and its write
//!   contract.

pub mod configuration;
pub mod keypath;
pub mod legal;
pub mod profile;
