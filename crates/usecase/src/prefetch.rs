//! Classification and stream acquisition ahead of the ordered commit loop.

use bundle_import_domain::{FormatTag, ImportTarget};
use bundle_import_ports::filesystem::{SourceBackend, SourceStream};
use bundle_import_shared_kernel::Result;

/// A target that has been classified and, if supported, opened.
pub(crate) enum Prepared<'t> {
    Skip(&'t ImportTarget),
    Ready {
        target: &'t ImportTarget,
        format: FormatTag,
        stream: Result<SourceStream>,
    },
}

fn prepare_one<'t>(backend: &dyn SourceBackend, target: &'t ImportTarget) -> Prepared<'t> {
    let format = target.format();
    if !format.is_supported() {
        return Prepared::Skip(target);
    }
    Prepared::Ready { target, format, stream: backend.open(target) }
}

/// Prepare one window of targets. The result keeps the window's order.
#[cfg(feature = "parallel")]
pub(crate) fn prepare_window<'t>(backend: &dyn SourceBackend, window: &'t [ImportTarget]) -> Vec<Prepared<'t>> {
    use rayon::prelude::*;

    if window.len() <= 1 {
        return window.iter().map(|t| prepare_one(backend, t)).collect();
    }
    window.par_iter().map(|t| prepare_one(backend, t)).collect()
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn prepare_window<'t>(backend: &dyn SourceBackend, window: &'t [ImportTarget]) -> Vec<Prepared<'t>> {
    window.iter().map(|t| prepare_one(backend, t)).collect()
}
