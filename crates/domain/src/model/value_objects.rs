pub mod format_tag;
pub mod provenance;

pub use format_tag::FormatTag;
pub use provenance::{ProvenanceRecord, SOURCE_KEY};
