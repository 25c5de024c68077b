// crates/ports/src/filesystem.rs
use std::io::Read;

use bundle_import_domain::{Backend, ImportTarget};
use bundle_import_shared_kernel::Result;

/// Readable payload of one source file. Dropping it releases the underlying handle.
pub type SourceStream = Box<dyn Read + Send>;

/// Port for a filesystem that source images are read from.
pub trait SourceBackend: Send + Sync {
    fn kind(&self) -> Backend;

    /// Direct children of `root` that are regular files, sorted by locator bytes.
    ///
    /// A missing root yields an empty listing rather than an error.
    fn list(&self, root: &str) -> Result<Vec<ImportTarget>>;

    fn open(&self, target: &ImportTarget) -> Result<SourceStream>;
}
