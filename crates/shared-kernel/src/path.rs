use std::path::{Path, PathBuf};

/// Convert a potentially relative path into an absolute one without resolving symlinks.
pub fn logical_absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

/// Sibling data file written next to a bundle index (`<bundle>.dat`).
pub fn data_file_path(bundle: &Path) -> PathBuf {
    let mut name = bundle.as_os_str().to_os_string();
    name.push(".dat");
    PathBuf::from(name)
}
