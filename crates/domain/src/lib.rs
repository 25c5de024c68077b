//! # Domain
//!
//! Pure import-pipeline concepts with no I/O:
//!
//! - [`model`]: discovered targets, format classification and provenance records
//! - [`config`]: the explicit per-run configuration
//! - [`options`]: backend selection
//! - [`session`]: session state machine and run counters

#![allow(clippy::multiple_crate_versions)]

pub mod config;
pub mod model;
pub mod options;
pub mod session;

pub use config::{ImportConfig, WebHdfsConfig};
pub use model::{FormatTag, ImportTarget, ProvenanceRecord, SOURCE_KEY};
pub use options::Backend;
pub use session::{ImportSummary, SessionEvent, SessionState};
