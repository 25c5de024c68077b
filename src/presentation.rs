//! Console output for an import run.
//!
//! Progress and the final summary go to stdout; the "nothing to import" notice goes to stderr.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use bundle_import_domain::{ImportConfig, ImportSummary, ImportTarget};
use bundle_import_ports::progress::ProgressSink;
use bundle_import_shared_kernel::{Result, path::data_file_path};

/// Writes ` ** added: <name>` lines as items are committed to the bundle.
pub struct ConsoleProgress<W: Write + Send = io::Stdout> {
    out: Mutex<W>,
}

impl ConsoleProgress<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleProgress<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_line(&self, line: std::fmt::Arguments<'_>) -> Result<()> {
        let mut out = self.out.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        out.write_fmt(line)?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> ProgressSink for ConsoleProgress<W> {
    fn on_added(&self, target: &ImportTarget) -> Result<()> {
        self.write_line(format_args!(" ** added: {}", target.name().to_lowercase()))
    }

    fn on_complete(&self, summary: &ImportSummary) -> Result<()> {
        self.write_line(format_args!("Imported: {} (skipped: {})", summary.accepted, summary.skipped))
    }
}

pub fn print_banner(config: &ImportConfig) {
    println!("Input image directory: {}", config.source_root);
    println!("Input FS: {}", config.backend.label());
    println!("Output bundle: {}", config.destination.display());
    println!("Overwrite bundle if it exists: {}", config.overwrite);
}

pub fn print_no_entries(config: &ImportConfig) {
    eprintln!(
        "Did not find any files in the {} directory [{}]",
        config.backend.label(),
        config.source_root
    );
}

pub fn print_created(destination: &Path) {
    println!("Created: {} and {}", destination.display(), data_file_path(destination).display());
}
