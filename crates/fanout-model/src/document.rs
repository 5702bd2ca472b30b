use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ModelError, ModelResult};
use crate::{KeyValues, Target, TargetSet};

/// Persisted per-target configuration: a JSON object keyed by target id,
/// each value itself an object of named addresses/flags.
///
/// Loaded once before a run, mutated in place by successful per-key reads,
/// persisted once after the run. A key is only overwritten when its read
/// succeeded; a failed read leaves the prior value untouched.
///
/// Backed by `BTreeMap` so that saving an unchanged document is
/// byte-identical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument(BTreeMap<String, KeyValues>);

impl ConfigDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse the document from a JSON file.
    pub fn load(path: &Path) -> ModelResult<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ModelError::DocumentIo(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| ModelError::DocumentParse(format!("{}: {e}", path.display())))
    }

    /// Persist the whole document, pretty-printed with a trailing newline.
    pub fn save(&self, path: &Path) -> ModelResult<()> {
        let mut out = serde_json::to_string_pretty(self)
            .map_err(|e| ModelError::DocumentParse(e.to_string()))?;
        out.push('\n');
        fs::write(path, out).map_err(|e| ModelError::DocumentIo(format!("{}: {e}", path.display())))
    }

    /// Targets present in the document, in key order.
    pub fn targets(&self) -> TargetSet {
        TargetSet::new(self.0.keys().map(Target::new))
    }

    /// Look up one value slot.
    pub fn get(&self, target: &Target, key: &str) -> Option<&Value> {
        self.0.get(target.as_str()).and_then(|entry| entry.get(key))
    }

    /// Look up one value slot as a string.
    pub fn get_str(&self, target: &Target, key: &str) -> Option<&str> {
        self.get(target, key).and_then(Value::as_str)
    }

    /// Set one value slot, creating the target entry if needed.
    pub fn insert(&mut self, target: &Target, key: impl Into<String>, value: Value) {
        self.0
            .entry(target.as_str().to_string())
            .or_default()
            .insert(key.into(), value);
    }

    /// Merge fetched values into the target's entry.
    ///
    /// Only keys present in `values` are overwritten; every other key of the
    /// entry keeps its prior value. Targets absent from the document are
    /// created, so a run can introduce new entries.
    pub fn apply(&mut self, target: &Target, values: &KeyValues) {
        if values.is_empty() {
            return;
        }
        let entry = self.0.entry(target.as_str().to_string()).or_default();
        for (key, value) in values {
            entry.insert(key.clone(), value.clone());
        }
    }

    /// Number of target entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the document has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::ConfigDocument;
    use crate::{KeyValues, Target};

    fn doc_with(target: &str, key: &str, value: serde_json::Value) -> ConfigDocument {
        let mut doc = ConfigDocument::new();
        doc.insert(&Target::new(target), key, value);
        doc
    }

    #[test]
    fn apply_overwrites_only_present_keys() {
        let mut doc = doc_with("base", "Vault", json!("0xold"));
        doc.insert(&Target::new("base"), "GiftedBox", json!("0xkeep"));

        let mut fetched = KeyValues::new();
        fetched.insert("Vault".into(), json!("0xnew"));
        doc.apply(&Target::new("base"), &fetched);

        assert_eq!(doc.get_str(&Target::new("base"), "Vault"), Some("0xnew"));
        assert_eq!(
            doc.get_str(&Target::new("base"), "GiftedBox"),
            Some("0xkeep")
        );
    }

    #[test]
    fn apply_with_empty_values_changes_nothing() {
        let mut doc = doc_with("base", "Vault", json!("0xold"));
        let before = doc.clone();

        doc.apply(&Target::new("base"), &KeyValues::new());
        assert_eq!(doc, before);
    }

    #[test]
    fn targets_follow_document_key_order() {
        let mut doc = ConfigDocument::new();
        doc.insert(&Target::new("10"), "Vault", json!("0xa"));
        doc.insert(&Target::new("1"), "Vault", json!("0xb"));

        let targets = doc.targets();
        let ids: Vec<_> = targets.iter().map(Target::as_str).collect();
        assert_eq!(ids, ["1", "10"]);
    }

    #[test]
    fn save_then_load_round_trips_byte_identically() {
        let mut doc = ConfigDocument::new();
        doc.insert(&Target::new("base"), "Vault", json!("0xabc"));
        doc.insert(&Target::new("sepolia"), "NFTVault", json!("0xdef"));

        let path = std::env::temp_dir().join(format!("fanout-doc-{}.json", std::process::id()));
        doc.save(&path).unwrap();
        let first = std::fs::read(&path).unwrap();

        let reloaded = ConfigDocument::load(&path).unwrap();
        assert_eq!(reloaded, doc);

        reloaded.save(&path).unwrap();
        let second = std::fs::read(&path).unwrap();
        assert_eq!(first, second);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_reports_parse_errors() {
        let path = std::env::temp_dir().join(format!("fanout-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{not json").unwrap();

        let err = ConfigDocument::load(&path).unwrap_err();
        assert!(err.to_string().contains("parse"));

        let _ = std::fs::remove_file(&path);
    }
}
