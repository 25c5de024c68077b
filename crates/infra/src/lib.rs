//! # Infrastructure
//!
//! Adapters implementing the ports:
//!
//! - [`filesystem`]: local disk and WebHDFS source backends
//! - [`persistence`]: the bundle writer and file helpers

// crates/infra/src/lib.rs
#![allow(clippy::multiple_crate_versions)]

pub mod filesystem;
pub mod persistence;

pub use filesystem::{LocalBackend, WebHdfsBackend, backend_for};
pub use persistence::{HibBundleSink, HibBundleWriter};
