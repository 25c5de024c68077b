use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use bundle_import_domain::{Backend, ImportTarget};
use bundle_import_ports::filesystem::{SourceBackend, SourceStream};
use bundle_import_shared_kernel::{InfrastructureError, Result, path::logical_absolute};
use tracing::{debug, warn};

use crate::persistence::FileReader;

/// Source backend over the local filesystem.
#[derive(Debug, Default)]
pub struct LocalBackend;

impl LocalBackend {
    pub fn new() -> Self {
        Self
    }
}

impl SourceBackend for LocalBackend {
    fn kind(&self) -> Backend {
        Backend::Local
    }

    fn list(&self, root: &str) -> Result<Vec<ImportTarget>> {
        let root = logical_absolute(Path::new(root));
        let entries = match fs::read_dir(&root) {
            Ok(entries) => entries,
            Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                debug!(root = %root.display(), error = %err, "source root not listable");
                return Ok(Vec::new());
            }
            // An unreadable root counts as an empty listing, like a missing one.
            Err(err) => {
                warn!(root = %root.display(), error = %err, "cannot list source root");
                return Ok(Vec::new());
            }
        };

        let mut targets = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| InfrastructureError::FileSystemOperation {
                operation: "read_dir".into(),
                path: root.clone(),
                source,
            })?;
            let path = entry.path();
            if !is_regular_file(&entry, &path) {
                continue;
            }
            match (entry.file_name().to_str(), path.to_str()) {
                (Some(name), Some(locator)) => targets.push(ImportTarget::new(name, locator, Backend::Local)),
                _ => warn!(path = %path.display(), "skipping file with a non UTF-8 name"),
            }
        }

        // Full listing first, then one sort; read_dir order is unspecified.
        targets.sort();
        Ok(targets)
    }

    fn open(&self, target: &ImportTarget) -> Result<SourceStream> {
        let reader = FileReader::open_buffered(&PathBuf::from(target.locator()))?;
        Ok(Box::new(reader))
    }
}

// Symlinks count when they point at a regular file.
fn is_regular_file(entry: &fs::DirEntry, path: &Path) -> bool {
    match entry.file_type() {
        Ok(ft) if ft.is_file() => true,
        Ok(ft) if ft.is_symlink() => fs::metadata(path).map(|m| m.is_file()).unwrap_or(false),
        _ => false,
    }
}
