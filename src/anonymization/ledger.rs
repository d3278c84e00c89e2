//! Consistency ledger
//!
//! Maps `(type, original)` to the replacement handed out the first time the
//! pair was met. Entries are write-once: an existing mapping is never
//! replaced, which is what keeps every occurrence of a value across a batch
//! pointing at the same substitute.

use crate::anonymization::models::PiiCategory;
use crate::domain::{Result, ResultExt};
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One recorded substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Personal-data type
    #[serde(rename = "type")]
    pub category: PiiCategory,
    /// Original value (string form)
    pub original: String,
    /// Synthetic substitute
    pub replacement: String,
}

impl LedgerEntry {
    /// Composite snapshot key, `"{type}:{original}"`
    pub fn key(&self) -> String {
        ledger_key(&self.category, &self.original)
    }
}

/// Snapshot of a ledger in first-insertion order
pub type LedgerSnapshot = IndexMap<String, LedgerEntry>;

/// Composite key for `category` and `original`
pub fn ledger_key(category: &PiiCategory, original: &str) -> String {
    format!("{category}:{original}")
}

/// Thread-safe, write-once substitution table
#[derive(Debug, Default)]
pub struct Ledger {
    entries: Mutex<LedgerSnapshot>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the replacement recorded for `(category, original)`
    pub fn get(&self, category: &PiiCategory, original: &str) -> Option<String> {
        self.entries
            .lock()
            .get(&ledger_key(category, original))
            .map(|entry| entry.replacement.clone())
    }

    /// Record `replacement` unless the pair is already mapped.
    ///
    /// Returns the replacement that is in the ledger afterwards, which is the
    /// earlier one when another caller got there first.
    pub fn insert_if_absent(
        &self,
        category: &PiiCategory,
        original: &str,
        replacement: String,
    ) -> String {
        let mut entries = self.entries.lock();
        entries
            .entry(ledger_key(category, original))
            .or_insert_with(|| LedgerEntry {
                category: category.clone(),
                original: original.to_string(),
                replacement,
            })
            .replacement
            .clone()
    }

    /// Merge a previously persisted snapshot. Keys already present win.
    ///
    /// Returns the number of entries added.
    pub fn merge(&self, snapshot: LedgerSnapshot) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        for (key, entry) in snapshot {
            entries.entry(key).or_insert(entry);
        }
        entries.len() - before
    }

    /// Copy of every entry in insertion order
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.entries.lock().clone()
    }

    /// Number of recorded substitutions
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Forget every mapping
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Write the ledger as pretty JSON, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(&self.snapshot())?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write ledger {}", path.display()))?;

        tracing::debug!(path = %path.display(), entries = self.len(), "Saved ledger");
        Ok(())
    }

    /// Read a snapshot written by [`save`](Self::save)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<LedgerSnapshot> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read ledger {}", path.display()))?;
        let snapshot: LedgerSnapshot = serde_json::from_str(&content)
            .with_context(|| format!("Invalid ledger file {}", path.display()))?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_insert_wins() {
        let ledger = Ledger::new();
        let first = ledger.insert_if_absent(&PiiCategory::Name, "홍길동", "테스트개인1".into());
        let second = ledger.insert_if_absent(&PiiCategory::Name, "홍길동", "테스트개인2".into());

        assert_eq!(first, "테스트개인1");
        assert_eq!(second, "테스트개인1");
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_same_original_different_type_is_separate() {
        let ledger = Ledger::new();
        ledger.insert_if_absent(&PiiCategory::Name, "Kim", "a".into());
        ledger.insert_if_absent(&PiiCategory::CompanyName, "Kim", "b".into());

        assert_eq!(ledger.get(&PiiCategory::Name, "Kim"), Some("a".into()));
        assert_eq!(ledger.get(&PiiCategory::CompanyName, "Kim"), Some("b".into()));
    }

    #[test]
    fn test_snapshot_keys_and_order() {
        let ledger = Ledger::new();
        ledger.insert_if_absent(&PiiCategory::Phone, "010-1234-5678", "555-1111-2222".into());
        ledger.insert_if_absent(&PiiCategory::Name, "홍길동", "테스트개인7".into());

        let snapshot = ledger.snapshot();
        let keys: Vec<_> = snapshot.keys().cloned().collect();
        assert_eq!(keys, vec!["phone:010-1234-5678", "name:홍길동"]);
        assert_eq!(snapshot["name:홍길동"].key(), "name:홍길동");
    }

    #[test]
    fn test_clear() {
        let ledger = Ledger::new();
        ledger.insert_if_absent(&PiiCategory::Email, "a@b.co", "x".into());
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.get(&PiiCategory::Email, "a@b.co"), None);
    }

    #[test]
    fn test_merge_never_overwrites() {
        let ledger = Ledger::new();
        ledger.insert_if_absent(&PiiCategory::Name, "홍길동", "테스트개인1".into());

        let other = Ledger::new();
        other.insert_if_absent(&PiiCategory::Name, "홍길동", "테스트개인9".into());
        other.insert_if_absent(&PiiCategory::Name, "김철수", "테스트개인2".into());

        assert_eq!(ledger.merge(other.snapshot()), 1);
        assert_eq!(ledger.get(&PiiCategory::Name, "홍길동"), Some("테스트개인1".into()));
        assert_eq!(ledger.get(&PiiCategory::Name, "김철수"), Some("테스트개인2".into()));
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/ledger.json");

        let ledger = Ledger::new();
        ledger.insert_if_absent(&PiiCategory::Ssn, "900101-1234567", "901332-1234560".into());
        ledger.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(raw["ssn:900101-1234567"]["type"], "ssn");
        assert_eq!(raw["ssn:900101-1234567"]["replacement"], "901332-1234560");

        let loaded = Ledger::load(&path).unwrap();
        assert_eq!(loaded, ledger.snapshot());
    }

    #[test]
    fn test_load_missing_file_fails_with_context() {
        let err = Ledger::load("/nonexistent/ledger.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read ledger"));
    }
}
