// crates/domain/src/options.rs
use std::fmt;

use serde::{Deserialize, Serialize};

/// Filesystem a source directory lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Local,
    Distributed,
}

impl Backend {
    pub fn from_hdfs_flag(hdfs_input: bool) -> Self {
        if hdfs_input { Self::Distributed } else { Self::Local }
    }

    /// Label used in console output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Local => "local FS",
            Self::Distributed => "HDFS",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
