use std::fmt;

use serde::{Deserialize, Serialize};

/// Encoding family of a source file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FormatTag {
    Jpeg,
    Png,
    Nifti,
    Dicom,
    Unsupported,
}

impl FormatTag {
    /// Every tag a bundle can store.
    pub const SUPPORTED: [FormatTag; 4] = [Self::Jpeg, Self::Png, Self::Nifti, Self::Dicom];

    /// Classify a file name by the text after its last `.`, ignoring case.
    ///
    /// Names without a `.` are [`FormatTag::Unsupported`].
    pub fn classify(file_name: &str) -> Self {
        match file_name.rsplit_once('.') {
            Some((_, ext)) => Self::from_extension(ext),
            None => Self::Unsupported,
        }
    }

    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Self::Jpeg,
            "png" => Self::Png,
            "nii" => Self::Nifti,
            "dcm" => Self::Dicom,
            _ => Self::Unsupported,
        }
    }

    pub fn is_supported(self) -> bool {
        Self::SUPPORTED.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Nifti => "NIFTI",
            Self::Dicom => "DICOM",
            Self::Unsupported => "UNSUPPORTED",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
