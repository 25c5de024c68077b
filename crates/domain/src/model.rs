pub mod entities;
pub mod value_objects;

pub use entities::ImportTarget;
pub use value_objects::{FormatTag, ProvenanceRecord, SOURCE_KEY};
