// crates/domain/src/config.rs
use std::{path::PathBuf, time::Duration};

use bundle_import_shared_kernel::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

use crate::options::Backend;

pub const DEFAULT_WEBHDFS_ENDPOINT: &str = "http://localhost:9870";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for the distributed backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebHdfsConfig {
    /// Base URL of the namenode's HTTP interface, e.g. `http://namenode:9870`.
    pub endpoint: String,
    /// Sent as `user.name` when present.
    pub user: Option<String>,
    pub timeout: Duration,
}

impl Default for WebHdfsConfig {
    fn default() -> Self {
        Self { endpoint: DEFAULT_WEBHDFS_ENDPOINT.to_string(), user: None, timeout: DEFAULT_HTTP_TIMEOUT }
    }
}

/// Everything one import run needs. Built once at startup and passed down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    pub source_root: String,
    pub destination: PathBuf,
    pub overwrite: bool,
    pub backend: Backend,
    /// Size of the stream prefetch window; `1` keeps everything sequential.
    pub jobs: usize,
    pub webhdfs: WebHdfsConfig,
}

impl ImportConfig {
    pub fn new(source_root: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            destination: destination.into(),
            overwrite: false,
            backend: Backend::Local,
            jobs: 1,
            webhdfs: WebHdfsConfig::default(),
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_webhdfs(mut self, webhdfs: WebHdfsConfig) -> Self {
        self.webhdfs = webhdfs;
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.source_root.trim().is_empty() {
            return Err(DomainError::InvalidConfiguration { reason: "source directory is empty".into() });
        }
        if self.destination.as_os_str().is_empty() {
            return Err(DomainError::InvalidConfiguration { reason: "output bundle path is empty".into() });
        }
        if self.jobs == 0 {
            return Err(DomainError::InvalidConfiguration { reason: "jobs must be at least 1".into() });
        }
        if self.backend == Backend::Distributed && self.webhdfs.endpoint.trim().is_empty() {
            return Err(DomainError::InvalidConfiguration { reason: "WebHDFS endpoint is empty".into() });
        }
        Ok(())
    }
}
