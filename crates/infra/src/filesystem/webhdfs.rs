//! Distributed filesystem backend speaking the WebHDFS REST API.
//!
//! Listing uses `op=LISTSTATUS` on the directory, reads use `op=OPEN` (the namenode
//! redirects to a datanode, which the client follows). Locators keep the scheme and
//! authority the root was given with, so provenance records stay fully qualified.

use bundle_import_domain::{Backend, ImportTarget, WebHdfsConfig};
use bundle_import_ports::filesystem::{SourceBackend, SourceStream};
use bundle_import_shared_kernel::{InfraResult, InfrastructureError, Result};
use reqwest::{
    StatusCode, Url,
    blocking::{Client, ClientBuilder, Response},
};
use serde::Deserialize;
use tracing::debug;

const API_PREFIX: &str = "/webhdfs/v1";

pub struct WebHdfsBackend {
    client: Client,
    endpoint: Url,
    user: Option<String>,
}

impl WebHdfsBackend {
    pub fn new(config: &WebHdfsConfig) -> Result<Self> {
        Self::with_client_builder(config, Client::builder())
    }

    fn with_client_builder(config: &WebHdfsConfig, builder: ClientBuilder) -> Result<Self> {
        let endpoint = Url::parse(config.endpoint.trim()).map_err(|e| InfrastructureError::InvalidLocator {
            locator: config.endpoint.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") || endpoint.host_str().is_none() {
            return Err(InfrastructureError::InvalidLocator {
                locator: config.endpoint.clone(),
                reason: "WebHDFS endpoint must be an http(s) URL with a host".into(),
            }
            .into());
        }
        let client = builder.timeout(config.timeout).build().map_err(|e| InfrastructureError::Http {
            operation: "build client".into(),
            url: endpoint.to_string(),
            details: e.to_string(),
        })?;
        Ok(Self { client, endpoint, user: config.user.clone() })
    }

    fn resolve_root(&self, root: &str) -> InfraResult<HdfsLocation> {
        HdfsLocation::parse(root, &self.endpoint, self.user.as_deref())
    }

    fn operation_url(&self, path: &str, op: &str) -> Url {
        let mut url = self.endpoint.clone();
        let base = self.endpoint.path().trim_end_matches('/');
        url.set_path(&format!("{base}{API_PREFIX}{path}"));
        {
            let mut query = url.query_pairs_mut();
            query.clear().append_pair("op", op);
            if let Some(user) = &self.user {
                query.append_pair("user.name", user);
            }
        }
        url
    }

    fn get(&self, url: &Url, operation: &str) -> InfraResult<Response> {
        debug!(%url, operation, "webhdfs request");
        self.client.get(url.clone()).send().map_err(|e| http_error(operation, url, e.to_string()))
    }
}

impl SourceBackend for WebHdfsBackend {
    fn kind(&self) -> Backend {
        Backend::Distributed
    }

    fn list(&self, root: &str) -> Result<Vec<ImportTarget>> {
        let location = self.resolve_root(root)?;
        let url = self.operation_url(&location.path, "LISTSTATUS");
        let response = self.get(&url, "LISTSTATUS")?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(root, "directory not found on HDFS");
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(http_error("LISTSTATUS", &url, format!("{status}: {}", remote_message(&body))).into());
        }

        let body = response.text().map_err(|e| http_error("LISTSTATUS", &url, e.to_string()))?;
        let mut targets = parse_listing(&body, &location)?;
        targets.sort();
        Ok(targets)
    }

    fn open(&self, target: &ImportTarget) -> Result<SourceStream> {
        let location = self.resolve_root(target.locator())?;
        let url = self.operation_url(&location.path, "OPEN");
        let response = self.get(&url, "OPEN")?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(http_error("OPEN", &url, format!("{status}: {}", remote_message(&body))).into());
        }
        Ok(Box::new(response))
    }
}

fn http_error(operation: &str, url: &Url, details: String) -> InfrastructureError {
    InfrastructureError::Http { operation: operation.into(), url: url.to_string(), details }
}

/// A path on HDFS plus the `scheme://authority` prefix used to qualify it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HdfsLocation {
    prefix: String,
    path: String,
}

impl HdfsLocation {
    fn parse(raw: &str, endpoint: &Url, user: Option<&str>) -> InfraResult<Self> {
        let raw = raw.trim();
        let invalid = |reason: &str| InfrastructureError::InvalidLocator { locator: raw.into(), reason: reason.into() };

        let (prefix, path) = if let Some((scheme, rest)) = raw.split_once("://") {
            if !matches!(scheme, "hdfs" | "webhdfs" | "swebhdfs") {
                return Err(invalid("expected an hdfs:// or webhdfs:// URI"));
            }
            let (authority, path) = match rest.find('/') {
                Some(idx) => rest.split_at(idx),
                None => (rest, "/"),
            };
            if authority.is_empty() {
                return Err(invalid("missing authority"));
            }
            (format!("{scheme}://{authority}"), path.to_string())
        } else {
            let host = endpoint.host_str().ok_or_else(|| invalid("endpoint has no host"))?;
            let authority = match endpoint.port_or_known_default() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            };
            let path = if raw.starts_with('/') {
                raw.to_string()
            } else {
                let user = user.ok_or_else(|| invalid("relative path needs a user to resolve the home directory"))?;
                format!("/user/{user}/{raw}")
            };
            (format!("webhdfs://{authority}"), path)
        };

        Ok(Self { prefix, path: normalize_path(&path) })
    }

    fn child(&self, name: &str) -> Self {
        let path = if self.path == "/" { format!("/{name}") } else { format!("{}/{name}", self.path) };
        Self { prefix: self.prefix.clone(), path }
    }

    fn locator(&self) -> String {
        format!("{}{}", self.prefix, self.path)
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/".to_string() } else { trimmed.to_string() }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListStatusResponse {
    file_statuses: FileStatuses,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FileStatuses {
    #[serde(default)]
    file_status: Vec<FileStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileStatus {
    path_suffix: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RemoteExceptionBody {
    remote_exception: RemoteException,
}

#[derive(Debug, Deserialize)]
struct RemoteException {
    message: String,
}

fn parse_listing(body: &str, dir: &HdfsLocation) -> InfraResult<Vec<ImportTarget>> {
    let response: ListStatusResponse = serde_json::from_str(body)?;
    Ok(response
        .file_statuses
        .file_status
        .into_iter()
        // An empty suffix means the root itself is a file.
        .filter(|status| status.kind == "FILE" && !status.path_suffix.is_empty())
        .map(|status| {
            let locator = dir.child(&status.path_suffix).locator();
            ImportTarget::new(status.path_suffix, locator, Backend::Distributed)
        })
        .collect())
}

fn remote_message(body: &str) -> String {
    serde_json::from_str::<RemoteExceptionBody>(body)
        .map(|b| b.remote_exception.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
