//! # API Shared
//!
//! Shared definitions for the doctor directory API.
//!
//! Contains:
//! - JSON wire types (`wire` module) used by the REST server and its clients
//!
//! Used by `docdir-core`, `api-rest` and `docdir-form`.

pub mod wire;

pub use wire::*;
