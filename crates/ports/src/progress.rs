// crates/ports/src/progress.rs
use bundle_import_domain::{ImportSummary, ImportTarget};
use bundle_import_shared_kernel::Result;

pub trait ProgressSink: Send + Sync {
    fn on_added(&self, target: &ImportTarget) -> Result<()>;
    fn on_complete(&self, summary: &ImportSummary) -> Result<()>;
}
