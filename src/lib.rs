//! geo2sql library
//!
//! Hierarchical configuration resolution for bulk geo file imports: every
//! directory may carry a `config.json` inherited by everything beneath it,
//! and every item may carry a sidecar override. This crate resolves, per
//! item, the database binding and settings a loader should use.

pub mod batch;
pub mod cli;
pub mod config;
pub mod discover;
pub mod error;
pub mod format;
pub mod resolve;
pub mod sink;
pub mod validate;
