// crates/shared-kernel/src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Root error type shared across the workspace.
#[derive(Debug, Error)]
pub enum BundleImportError {
    /// Adds human context; the wrapped error stays reachable through `source()`.
    #[error("{context}")]
    Context {
        context: String,
        #[source]
        source: Box<BundleImportError>,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error(transparent)]
    Presentation(#[from] PresentationError),
}

pub type Result<T> = std::result::Result<T, BundleImportError>;

impl BundleImportError {
    /// Follows context and application wrappers down to the error that started the chain.
    pub fn root_cause(&self) -> &BundleImportError {
        match self {
            Self::Context { source, .. } => source.root_cause(),
            Self::Application(app) => match app.inner() {
                Some(inner) => inner.root_cause(),
                None => self,
            },
            _ => self,
        }
    }

    /// True when the destination bundle already existed and overwriting was not requested.
    pub fn is_open_conflict(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::Infrastructure(InfrastructureError::DestinationExists { .. })
        )
    }
}

/// Domain-layer specific errors.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("Illegal session transition: {event} while {state}")]
    IllegalTransition { state: String, event: String },
}

pub type DomainResult<T> = std::result::Result<T, DomainError>;

/// Application-layer errors raised by the import session.
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Failed to list source directory '{root}'")]
    EnumerationFailed {
        root: String,
        #[source]
        source: Box<BundleImportError>,
    },

    #[error("Failed to open bundle '{destination}'")]
    OpenFailed {
        destination: PathBuf,
        #[source]
        source: Box<BundleImportError>,
    },

    #[error("Failed to open source stream '{locator}'")]
    StreamAcquisition {
        locator: String,
        #[source]
        source: Box<BundleImportError>,
    },

    #[error("Failed to append '{locator}' to bundle")]
    AppendFailed {
        locator: String,
        #[source]
        source: Box<BundleImportError>,
    },

    #[error("Failed to close bundle '{destination}'")]
    CloseFailed {
        destination: PathBuf,
        #[source]
        source: Box<BundleImportError>,
    },
}

impl ApplicationError {
    fn inner(&self) -> Option<&BundleImportError> {
        match self {
            Self::EnumerationFailed { source, .. }
            | Self::OpenFailed { source, .. }
            | Self::StreamAcquisition { source, .. }
            | Self::AppendFailed { source, .. }
            | Self::CloseFailed { source, .. } => Some(source),
        }
    }
}

pub type ApplicationResult<T> = std::result::Result<T, ApplicationError>;

/// Infrastructure-layer errors.
#[derive(Debug, Error)]
pub enum InfrastructureError {
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File system operation failed: {operation} on '{path}': {source}")]
    FileSystemOperation {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Bundle '{path}' already exists (use --force to overwrite)")]
    DestinationExists { path: PathBuf },

    #[error("Bundle rejected payload: {reason}")]
    PayloadRejected { reason: String },

    #[error("Failed to parse {format} output: {details}")]
    SerializationError { format: String, details: String },

    #[error("HTTP request failed: {operation} {url} - {details}")]
    Http {
        operation: String,
        url: String,
        details: String,
    },

    #[error("Invalid locator '{locator}': {reason}")]
    InvalidLocator { locator: String, reason: String },

    #[error("Output error: {message}")]
    OutputError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

pub type InfraResult<T> = std::result::Result<T, InfrastructureError>;

/// Presentation-layer errors.
#[derive(Debug, Error)]
pub enum PresentationError {
    #[error("Invalid CLI value: {flag} = {value} - {reason}")]
    InvalidValue {
        flag: String,
        value: String,
        reason: String,
    },

    #[error("Configuration building failed: {0}")]
    ConfigBuildFailed(String),
}

pub type PresentationResult<T> = std::result::Result<T, PresentationError>;

impl From<std::io::Error> for InfrastructureError {
    fn from(err: std::io::Error) -> Self {
        Self::OutputError { message: err.to_string(), source: Some(Box::new(err)) }
    }
}

impl From<std::io::Error> for BundleImportError {
    fn from(err: std::io::Error) -> Self {
        InfrastructureError::from(err).into()
    }
}

impl From<serde_json::Error> for InfrastructureError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            format: "JSON".to_string(),
            details: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BundleImportError {
    fn from(err: serde_json::Error) -> Self {
        InfrastructureError::from(err).into()
    }
}

/// Extension trait to add additional context to results.
pub trait ErrorContext<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<BundleImportError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| BundleImportError::Context {
            context: context.into(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| BundleImportError::Context {
            context: f(),
            source: Box::new(e.into()),
        })
    }
}
