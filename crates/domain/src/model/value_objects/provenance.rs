use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ImportTarget;

/// Metadata key holding the fully qualified origin of an imported item.
pub const SOURCE_KEY: &str = "SOURCE";

/// Per-item metadata handed to the bundle writer alongside the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProvenanceRecord(BTreeMap<String, String>);

impl ProvenanceRecord {
    /// Record carrying only the target's locator under [`SOURCE_KEY`].
    pub fn for_target(target: &ImportTarget) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(SOURCE_KEY.to_string(), target.locator().to_string());
        Self(entries)
    }

    pub fn source(&self) -> Option<&str> {
        self.get(SOURCE_KEY)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Backend;

    #[test]
    fn contains_exactly_the_source_key() {
        let target = ImportTarget::new("a.png", "/data/in/a.png", Backend::Local);
        let record = ProvenanceRecord::for_target(&target);

        assert_eq!(record.iter().count(), 1);
        assert_eq!(record.source(), Some("/data/in/a.png"));
        assert_eq!(record.iter().collect::<Vec<_>>(), [("SOURCE", "/data/in/a.png")]);
    }

    #[test]
    fn serializes_as_a_flat_map() {
        let target = ImportTarget::new("x.dcm", "hdfs://nn:8020/x.dcm", Backend::Distributed);
        let json = serde_json::to_string(&ProvenanceRecord::for_target(&target)).unwrap();
        assert_eq!(json, r#"{"SOURCE":"hdfs://nn:8020/x.dcm"}"#);
    }
}
