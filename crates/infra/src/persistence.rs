pub mod bundle_writer;
pub mod file_reader;

pub use bundle_writer::{HibBundleSink, HibBundleWriter, IndexEntry, INDEX_MAGIC};
pub use file_reader::FileReader;
