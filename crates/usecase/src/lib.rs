//! # Use Cases
//!
//! Application-level orchestration logic.
//!
//! This crate coordinates domain logic and port implementations
//! to implement the import run:
//!
//! - [`orchestrator`]: The import session (enumerate, classify, append, close)
//! - [`dto`]: Data transfer objects for use case boundaries
//!
//! Use cases depend on both domain and ports, but not on infrastructure.

#![allow(clippy::multiple_crate_versions)]

pub mod dto;
pub mod orchestrator;
mod prefetch;

pub use dto::ImportOutcome;
pub use orchestrator::ImportSession;
