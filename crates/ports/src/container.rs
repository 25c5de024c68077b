// crates/ports/src/container.rs
use std::{io::Read, path::Path};

use bundle_import_domain::{FormatTag, ProvenanceRecord};
use bundle_import_shared_kernel::Result;

/// Factory side of the bundle writer: opens a destination for appending.
pub trait ContainerSink {
    /// Fails when the destination exists and `overwrite` is false.
    fn open(&self, destination: &Path, overwrite: bool) -> Result<Box<dyn BundleWriter>>;
}

/// An open bundle. Single writer; calls must arrive in the intended item order.
pub trait BundleWriter {
    fn append(&mut self, stream: &mut dyn Read, format: FormatTag, metadata: ProvenanceRecord) -> Result<()>;

    /// Finalizes the bundle. Consumes the handle so it cannot be closed twice.
    fn close(self: Box<Self>) -> Result<()>;
}
