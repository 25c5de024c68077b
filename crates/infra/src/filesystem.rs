// crates/infra/src/filesystem.rs
pub mod local;
pub mod webhdfs;

use bundle_import_domain::{Backend, ImportConfig};
use bundle_import_ports::filesystem::SourceBackend;
use bundle_import_shared_kernel::{ErrorContext, Result};

pub use local::LocalBackend;
pub use webhdfs::WebHdfsBackend;

/// Build the source backend selected by the configuration.
pub fn backend_for(config: &ImportConfig) -> Result<Box<dyn SourceBackend>> {
    match config.backend {
        Backend::Local => Ok(Box::new(LocalBackend::new())),
        Backend::Distributed => {
            let backend = WebHdfsBackend::new(&config.webhdfs)
                .with_context(|| format!("WebHDFS endpoint {}", config.webhdfs.endpoint))?;
            Ok(Box::new(backend))
        }
    }
}
