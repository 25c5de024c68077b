// crates/infra/src/persistence/bundle_writer.rs
//! Image bundle writer: an index file plus a sibling `<bundle>.dat` data file.
//!
//! Data file, one record per image:
//!
//! ```text
//! u8 format | u32 BE metadata length | metadata JSON | payload bytes
//! ```
//!
//! Index file, written on close:
//!
//! ```text
//! "HIBIDX01" | u64 BE count | count x (u64 BE record offset, u64 BE payload length)
//! ```

use std::{
    fs::{self, File, OpenOptions},
    io::{BufWriter, ErrorKind, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use bundle_import_domain::{FormatTag, ProvenanceRecord};
use bundle_import_ports::container::{BundleWriter, ContainerSink};
use bundle_import_shared_kernel::{InfraResult, InfrastructureError, Result, path::data_file_path};
use fs2::FileExt;
use tracing::debug;

pub const INDEX_MAGIC: &[u8; 8] = b"HIBIDX01";

const COPY_BUFFER: usize = 64 * 1024;

/// Location of one stored image inside the data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub offset: u64,
    pub payload_len: u64,
}

/// On-disk code for a format; `None` for formats a bundle cannot hold.
pub fn format_code(format: FormatTag) -> Option<u8> {
    match format {
        FormatTag::Jpeg => Some(1),
        FormatTag::Png => Some(2),
        FormatTag::Nifti => Some(3),
        FormatTag::Dicom => Some(4),
        FormatTag::Unsupported => None,
    }
}

/// Opens [`HibBundleWriter`]s.
#[derive(Debug, Default)]
pub struct HibBundleSink;

impl HibBundleSink {
    pub fn new() -> Self {
        Self
    }
}

impl ContainerSink for HibBundleSink {
    fn open(&self, destination: &Path, overwrite: bool) -> Result<Box<dyn BundleWriter>> {
        Ok(Box::new(HibBundleWriter::create(destination, overwrite)?))
    }
}

pub struct HibBundleWriter {
    index_path: PathBuf,
    data_path: PathBuf,
    index: File,
    data: BufWriter<File>,
    position: u64,
    entries: Vec<IndexEntry>,
}

impl HibBundleWriter {
    /// Claims both files of the bundle. Without `overwrite`, an existing index or data
    /// file is an error and neither is modified.
    pub fn create(index_path: &Path, overwrite: bool) -> InfraResult<Self> {
        let data_path = data_file_path(index_path);
        if !overwrite {
            for existing in [index_path, data_path.as_path()] {
                if existing.exists() {
                    return Err(InfrastructureError::DestinationExists { path: index_path.to_path_buf() });
                }
            }
        }

        if let Some(parent) = index_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| InfrastructureError::FileSystemOperation {
                operation: "create_dir_all".into(),
                path: parent.to_path_buf(),
                source,
            })?;
        }

        // Truncate only while holding the data file lock.
        let data = open_for_write(&data_path, overwrite, index_path)?;
        FileExt::try_lock_exclusive(&data).map_err(|source| InfrastructureError::FileSystemOperation {
            operation: "lock".into(),
            path: data_path.clone(),
            source,
        })?;
        let index = open_for_write(index_path, overwrite, index_path)?;
        if overwrite {
            truncate_file(&data, &data_path)?;
            truncate_file(&index, index_path)?;
        }

        debug!(index = %index_path.display(), data = %data_path.display(), overwrite, "bundle opened");
        Ok(Self {
            index_path: index_path.to_path_buf(),
            data_path,
            index,
            data: BufWriter::new(data),
            position: 0,
            entries: Vec::new(),
        })
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    fn write_data(&mut self, bytes: &[u8]) -> InfraResult<()> {
        self.data.write_all(bytes).map_err(|source| self.write_error(source))
    }

    fn write_error(&self, source: std::io::Error) -> InfrastructureError {
        InfrastructureError::FileWrite { path: self.data_path.clone(), source }
    }

    /// Drop a partially written record so the data file ends at the last good one.
    fn truncate_to(&mut self, offset: u64) -> InfraResult<()> {
        self.data.flush().map_err(|e| self.write_error(e))?;
        self.data.get_ref().set_len(offset).map_err(|e| self.write_error(e))?;
        self.data.seek(SeekFrom::Start(offset)).map_err(|e| self.write_error(e))?;
        self.position = offset;
        Ok(())
    }

    /// Source read failures become `FileRead`, data file failures `FileWrite`.
    fn copy_payload(&mut self, stream: &mut dyn Read, source: &str) -> InfraResult<u64> {
        let mut buf = vec![0u8; COPY_BUFFER];
        let mut total = 0u64;
        loop {
            let n = match stream.read(&mut buf) {
                Ok(0) => return Ok(total),
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(InfrastructureError::FileRead { path: PathBuf::from(source), source: e }),
            };
            self.write_data(&buf[..n])?;
            total += n as u64;
        }
    }

    fn append_record(&mut self, stream: &mut dyn Read, format: FormatTag, metadata: &ProvenanceRecord) -> InfraResult<()> {
        let code = format_code(format).ok_or_else(|| InfrastructureError::PayloadRejected {
            reason: format!("format {format} cannot be stored"),
        })?;
        let meta = serde_json::to_vec(metadata)?;
        let meta_len = u32::try_from(meta.len())
            .map_err(|_| InfrastructureError::PayloadRejected { reason: "metadata too large".into() })?;
        let source = metadata.source().unwrap_or_default().to_string();

        let offset = self.position;
        let result = (|| -> InfraResult<u64> {
            self.write_data(&[code])?;
            self.write_data(&meta_len.to_be_bytes())?;
            self.write_data(&meta)?;
            let payload_len = self.copy_payload(stream, &source)?;
            if payload_len == 0 {
                return Err(InfrastructureError::PayloadRejected { reason: format!("empty payload from '{source}'") });
            }
            Ok(payload_len)
        })();

        match result {
            Ok(payload_len) => {
                self.position = offset + 1 + 4 + u64::from(meta_len) + payload_len;
                self.entries.push(IndexEntry { offset, payload_len });
                debug!(offset, payload_len, %format, "record written");
                Ok(())
            }
            Err(err) => {
                self.truncate_to(offset)?;
                Err(err)
            }
        }
    }

    fn write_index(&mut self) -> InfraResult<()> {
        let mut buf = Vec::with_capacity(16 + self.entries.len() * 16);
        buf.extend_from_slice(INDEX_MAGIC);
        buf.extend_from_slice(&(self.entries.len() as u64).to_be_bytes());
        for entry in &self.entries {
            buf.extend_from_slice(&entry.offset.to_be_bytes());
            buf.extend_from_slice(&entry.payload_len.to_be_bytes());
        }

        let index_path = self.index_path.clone();
        let index_error = |source: std::io::Error| InfrastructureError::FileWrite { path: index_path.clone(), source };
        self.index.seek(SeekFrom::Start(0)).map_err(index_error)?;
        self.index.write_all(&buf).map_err(index_error)?;
        self.index.set_len(buf.len() as u64).map_err(index_error)?;
        self.index.sync_all().map_err(index_error)?;
        Ok(())
    }
}

impl BundleWriter for HibBundleWriter {
    fn append(&mut self, stream: &mut dyn Read, format: FormatTag, metadata: ProvenanceRecord) -> Result<()> {
        Ok(self.append_record(stream, format, &metadata)?)
    }

    fn close(mut self: Box<Self>) -> Result<()> {
        self.data.flush().map_err(|e| self.write_error(e))?;
        self.data.get_ref().sync_all().map_err(|e| self.write_error(e))?;
        self.write_index()?;
        FileExt::unlock(self.data.get_ref()).map_err(|e| self.write_error(e))?;
        debug!(index = %self.index_path.display(), items = self.entries.len(), "bundle closed");
        Ok(())
    }
}

fn open_for_write(path: &Path, overwrite: bool, bundle: &Path) -> InfraResult<File> {
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(false);
    } else {
        options.create_new(true);
    }
    options.open(path).map_err(|source| {
        if source.kind() == ErrorKind::AlreadyExists {
            InfrastructureError::DestinationExists { path: bundle.to_path_buf() }
        } else {
            InfrastructureError::FileWrite { path: path.to_path_buf(), source }
        }
    })
}

fn truncate_file(file: &File, path: &Path) -> InfraResult<()> {
    file.set_len(0)
        .map_err(|source| InfrastructureError::FileWrite { path: path.to_path_buf(), source })
}
