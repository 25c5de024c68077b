use bundle_import_domain::ImportSummary;

/// Result of a run that did not hit a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The source listing was empty or missing; the destination was never touched.
    NoEntries,
    Completed(ImportSummary),
}

impl ImportOutcome {
    pub fn summary(&self) -> ImportSummary {
        match self {
            Self::NoEntries => ImportSummary::default(),
            Self::Completed(summary) => *summary,
        }
    }
}
