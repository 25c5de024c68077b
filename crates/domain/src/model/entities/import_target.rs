use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{model::FormatTag, options::Backend};

/// One file discovered directly under the source root.
///
/// Targets order by the bytes of their fully qualified locator, which is the
/// order they are appended to the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportTarget {
    name: String,
    locator: String,
    backend: Backend,
}

impl ImportTarget {
    pub fn new(name: impl Into<String>, locator: impl Into<String>, backend: Backend) -> Self {
        Self { name: name.into(), locator: locator.into(), backend }
    }

    /// Bare file name, as listed by the backend.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully qualified path on the backend.
    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn format(&self) -> FormatTag {
        FormatTag::classify(&self.name)
    }
}

impl Ord for ImportTarget {
    fn cmp(&self, other: &Self) -> Ordering {
        self.locator
            .as_bytes()
            .cmp(other.locator.as_bytes())
            .then_with(|| self.backend.cmp(&other.backend))
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for ImportTarget {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
