//! # Ports
//!
//! Interface definitions for external dependencies.
//!
//! This crate defines traits that abstract external concerns:
//!
//! - [`filesystem`]: Directory listing and stream opening on a backend
//! - [`container`]: The bundle writer's open/append/close contract
//! - [`progress`]: Progress reporting for imported items
//!
//! These ports allow the import session to remain independent of
//! specific filesystems and bundle formats.

// crates/ports/src/lib.rs
#![allow(clippy::multiple_crate_versions)]

pub mod container;
pub mod filesystem;
pub mod progress;
