#![allow(clippy::multiple_crate_versions)]

pub mod bootstrap;
pub mod cli;
pub mod logging;
pub mod presentation;

pub use bootstrap::{run, run_with_config};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
