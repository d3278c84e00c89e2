//! Consistent substitution of personal data
//!
//! The [`Replacer`] owns the [`Ledger`] and rewrites values and whole
//! documents. A replacement is a pure function of `(type, original)`:
//!
//! 1. the first four bytes of `md5("{type}:{original}")`, read big-endian,
//!    form the value's stable hash
//! 2. names and company names take `hash % 10000 + 1` as their index
//! 3. every other type seeds a local `StdRng` with the hash and asks the
//!    generator for a value
//!
//! so independent replacers, runs and call orders all agree. The ledger only
//! pins the first answer so it can be persisted and reported.

mod encoding;

use crate::anonymization::detector::identifier::scalar_text;
use crate::anonymization::detector::PiiDetector;
use crate::anonymization::generator::VirtualDataGenerator;
use crate::anonymization::ledger::{Ledger, LedgerSnapshot};
use crate::anonymization::models::{Identification, PiiCategory};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Modulus of the name / company name index space
pub const INDEX_SPACE: u32 = 10_000;

/// Stable 32-bit hash of `(category, original)`
pub fn stable_hash(category: &PiiCategory, original: &str) -> u32 {
    let digest = md5::compute(format!("{category}:{original}"));
    u32::from_be_bytes([digest.0[0], digest.0[1], digest.0[2], digest.0[3]])
}

/// Rewrites personal data into consistent synthetic values
pub struct Replacer {
    detector: Arc<dyn PiiDetector>,
    generator: VirtualDataGenerator,
    ledger: Ledger,
}

impl Replacer {
    /// Create a replacer with an empty ledger
    pub fn new(detector: Arc<dyn PiiDetector>) -> Self {
        Self {
            detector,
            generator: VirtualDataGenerator::new(),
            ledger: Ledger::new(),
        }
    }

    /// Identification backend
    pub fn detector(&self) -> &Arc<dyn PiiDetector> {
        &self.detector
    }

    /// Replacement for `original`, created and recorded on first use
    pub fn get_or_create(&self, category: &PiiCategory, original: &str) -> String {
        if let Some(existing) = self.ledger.get(category, original) {
            return existing;
        }

        // Generated outside the lock; a concurrent insert of the same pair
        // produced the same value anyway and the first one is kept
        let replacement = self.fabricate(category, original);
        tracing::trace!(pii_type = %category, "Created replacement");
        self.ledger.insert_if_absent(category, original, replacement)
    }

    /// Replacement `original` would get, without recording it
    pub fn preview(&self, category: &PiiCategory, original: &str) -> String {
        self.ledger
            .get(category, original)
            .unwrap_or_else(|| self.fabricate(category, original))
    }

    fn fabricate(&self, category: &PiiCategory, original: &str) -> String {
        let hash = stable_hash(category, original);

        if category.is_indexed() {
            let index = u64::from(hash % INDEX_SPACE) + 1;
            if let Some(value) = self.generator.generate_indexed(category, index) {
                return value;
            }
        }

        let mut rng = StdRng::seed_from_u64(u64::from(hash));
        self.generator.generate(category, &mut rng)
    }

    /// Rewrite a single scalar stored under `key`.
    ///
    /// Returns the new value and whether anything was substituted. Strings
    /// are tried as URLs first, then as percent-encoded text, then as plain
    /// values; other scalars only take the plain path.
    pub fn rewrite_value(&self, value: &Value, key: &str) -> (Value, bool) {
        let mut found = Vec::new();
        let mut record = |id: &Identification| self.get_or_create(&id.category, &id.value);
        match self.substitute(value, key, key, &mut found, &mut record) {
            Some(rewritten) => (rewritten, true),
            None => (value.clone(), false),
        }
    }

    /// Substitute `value` when it holds personal data.
    ///
    /// `resolve` maps each identification to its replacement. Every
    /// identification is pushed to `found`; query parameters are located as
    /// `path?param`.
    fn substitute<F>(
        &self,
        value: &Value,
        key: &str,
        path: &str,
        found: &mut Vec<Identification>,
        resolve: &mut F,
    ) -> Option<Value>
    where
        F: FnMut(&Identification) -> String,
    {
        if let Value::String(text) = value {
            if encoding::is_url_candidate(text, key) {
                let rewritten = encoding::rewrite_query(text, |name, param| {
                    let identification = self
                        .detector
                        .identify_str(param, name)?
                        .with_path(format!("{path}?{name}"));
                    let replacement = resolve(&identification);
                    found.push(identification);
                    Some(replacement)
                });
                if let Some(rewritten) = rewritten {
                    return Some(Value::String(rewritten));
                }
            }

            if text.contains('%') {
                match encoding::percent_decode(text) {
                    Ok(Some(decoded)) => {
                        if let Some(identification) = self.detector.identify_str(&decoded, key) {
                            let identification = identification.with_path(path);
                            let replacement = encoding::percent_encode(&resolve(&identification));
                            found.push(identification);
                            return Some(Value::String(replacement));
                        }
                    }
                    Ok(None) => {}
                    Err(skipped) => tracing::trace!(key, reason = %skipped, "Skipped percent decoding"),
                }
            }
        }

        if scalar_text(value).is_some() {
            if let Some(identification) = self.detector.identify(value, key) {
                let identification = identification.with_path(path);
                let replacement = resolve(&identification);
                found.push(identification);
                return Some(Value::String(replacement));
            }
        }

        None
    }

    /// Rebuild `document` with every personal-data leaf substituted.
    ///
    /// The input is left untouched. Leaves that are not personal data keep
    /// their exact JSON type.
    pub fn rewrite_tree(&self, document: &Value) -> Value {
        self.rewrite_tree_with_detections(document).0
    }

    /// [`rewrite_tree`](Self::rewrite_tree) that also reports every
    /// substitution it made, in document order
    pub fn rewrite_tree_with_detections(&self, document: &Value) -> (Value, Vec<Identification>) {
        let mut found = Vec::new();
        let mut record = |id: &Identification| self.get_or_create(&id.category, &id.value);
        let rewritten = self.rewrite_node(document, "", "", &mut found, &mut record);
        (rewritten, found)
    }

    /// Everything [`rewrite_tree`](Self::rewrite_tree) would substitute,
    /// without touching the ledger
    pub fn detect_tree(&self, document: &Value) -> Vec<Identification> {
        let mut found = Vec::new();
        let mut preview = |id: &Identification| self.preview(&id.category, &id.value);
        self.rewrite_node(document, "", "", &mut found, &mut preview);
        found
    }

    fn rewrite_node<F>(
        &self,
        node: &Value,
        path: &str,
        key: &str,
        found: &mut Vec<Identification>,
        resolve: &mut F,
    ) -> Value
    where
        F: FnMut(&Identification) -> String,
    {
        match node {
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(child_key, child)| {
                        let child_path = if path.is_empty() {
                            child_key.clone()
                        } else {
                            format!("{path}.{child_key}")
                        };
                        let rewritten = self.rewrite_node(child, &child_path, child_key, found, resolve);
                        (child_key.clone(), rewritten)
                    })
                    .collect::<Map<String, Value>>(),
            ),
            // Elements are looked up with the sequence's own key
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| {
                        self.rewrite_node(item, &format!("{path}[{idx}]"), key, found, resolve)
                    })
                    .collect(),
            ),
            scalar => self
                .substitute(scalar, key, path, found, resolve)
                .unwrap_or_else(|| scalar.clone()),
        }
    }

    /// Shared ledger
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Every recorded substitution, `"{type}:{original}"` keyed
    pub fn ledger_snapshot(&self) -> LedgerSnapshot {
        self.ledger.snapshot()
    }

    /// Merge a persisted ledger without overwriting existing mappings
    pub fn preload(&self, snapshot: LedgerSnapshot) -> usize {
        let added = self.ledger.merge(snapshot);
        tracing::info!(entries = added, "Preloaded ledger");
        added
    }

    /// Forget every mapping
    pub fn reset(&self) {
        self.ledger.clear();
        tracing::debug!("Ledger reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::detector::PatternIdentifier;
    use serde_json::json;

    fn replacer() -> Replacer {
        let identifier = PatternIdentifier::with_default_patterns().unwrap();
        Replacer::new(Arc::new(identifier))
    }

    #[test]
    fn test_stable_hash_is_md5_prefix() {
        // First eight hex digits of the digest
        let hex = format!("{:x}", md5::compute("name:홍길동".as_bytes()));
        let expected = u32::from_str_radix(&hex[..8], 16).unwrap();
        assert_eq!(stable_hash(&PiiCategory::Name, "홍길동"), expected);
    }

    #[test]
    fn test_name_index_comes_from_hash() {
        let r = replacer();
        let hash = stable_hash(&PiiCategory::Name, "홍길동");
        let expected = format!("테스트개인{}", hash % INDEX_SPACE + 1);
        assert_eq!(r.get_or_create(&PiiCategory::Name, "홍길동"), expected);
    }

    #[test]
    fn test_get_or_create_is_stable() {
        let r = replacer();
        let a = r.get_or_create(&PiiCategory::Phone, "010-1234-5678");
        let b = r.get_or_create(&PiiCategory::Phone, "010-1234-5678");
        assert_eq!(a, b);
        assert_eq!(r.ledger().len(), 1);
    }

    #[test]
    fn test_independent_replacers_agree() {
        let a = replacer();
        let b = replacer();
        // Different call order on purpose
        let a1 = a.get_or_create(&PiiCategory::Email, "kim@corp.co.kr");
        let a2 = a.get_or_create(&PiiCategory::Ssn, "900101-1234567");
        let b2 = b.get_or_create(&PiiCategory::Ssn, "900101-1234567");
        let b1 = b.get_or_create(&PiiCategory::Email, "kim@corp.co.kr");
        assert_eq!(a1, b1);
        assert_eq!(a2, b2);
    }

    #[test]
    fn test_preview_does_not_record() {
        let r = replacer();
        let preview = r.preview(&PiiCategory::Imei, "490154203237518");
        assert!(r.ledger().is_empty());
        assert_eq!(r.get_or_create(&PiiCategory::Imei, "490154203237518"), preview);
    }

    #[test]
    fn test_rewrite_value_plain() {
        let r = replacer();
        let (value, changed) = r.rewrite_value(&json!("010-1234-5678"), "phone");
        assert!(changed);
        assert_ne!(value, json!("010-1234-5678"));

        let (value, changed) = r.rewrite_value(&json!("hello"), "greeting");
        assert!(!changed);
        assert_eq!(value, json!("hello"));
    }

    #[test]
    fn test_rewrite_value_non_string_scalars_keep_type() {
        let r = replacer();
        assert_eq!(r.rewrite_value(&json!(42), "age"), (json!(42), false));
        assert_eq!(r.rewrite_value(&json!(true), "active"), (json!(true), false));
        assert_eq!(r.rewrite_value(&Value::Null, "name"), (Value::Null, false));
    }

    #[test]
    fn test_rewrite_value_number_becomes_string() {
        let r = replacer();
        let (value, changed) = r.rewrite_value(&json!(12345678901_u64), "account_no");
        assert!(changed);
        assert!(value.as_str().unwrap().starts_with("999"));
    }

    #[test]
    fn test_rewrite_value_url_query() {
        let r = replacer();
        let url = "https://x/y?name=%ED%99%8D%EA%B8%B8%EB%8F%99&page=2";
        let (value, changed) = r.rewrite_value(&json!(url), "url");
        assert!(changed);

        let expected_name = r.get_or_create(&PiiCategory::Name, "홍길동");
        let expected = format!("https://x/y?name={}&page=2", urlencoding::encode(&expected_name));
        assert_eq!(value, json!(expected));
    }

    #[test]
    fn test_rewrite_value_percent_encoded() {
        let r = replacer();
        let (value, changed) = r.rewrite_value(&json!("%ED%99%8D%EA%B8%B8%EB%8F%99"), "name");
        assert!(changed);

        let replacement = r.get_or_create(&PiiCategory::Name, "홍길동");
        assert_eq!(value, json!(urlencoding::encode(&replacement).into_owned()));
    }

    #[test]
    fn test_rewrite_value_invalid_percent_falls_through() {
        let r = replacer();
        let (value, changed) = r.rewrite_value(&json!("%FF%FE"), "note");
        assert!(!changed);
        assert_eq!(value, json!("%FF%FE"));
    }

    #[test]
    fn test_rewrite_tree_consistency() {
        let r = replacer();
        let doc = json!({"name": "홍길동", "nm": "홍길동", "phone": "010-1234-5678"});
        let out = r.rewrite_tree(&doc);

        assert_eq!(out["name"], out["nm"]);
        assert_ne!(out["name"], json!("홍길동"));
        let phone = out["phone"].as_str().unwrap();
        assert!(!phone.starts_with('0'));
        assert_eq!(doc["name"], json!("홍길동"));
    }

    #[test]
    fn test_rewrite_tree_sequences_use_enclosing_key() {
        let r = replacer();
        let doc = json!({
            "name": ["홍길동", 7, null],
            "users": [{"name": "홍길동"}, [{"email": "a@b.com"}]]
        });
        let out = r.rewrite_tree(&doc);

        assert_eq!(out["name"][0], out["users"][0]["name"]);
        assert_eq!(out["name"][1], json!(7));
        assert_eq!(out["name"][2], Value::Null);
        assert_ne!(out["users"][1][0]["email"], json!("a@b.com"));
    }

    #[test]
    fn test_rewrite_tree_preserves_key_order() {
        let r = replacer();
        let doc = json!({"z": 1, "a": 2, "name": "홍길동", "m": 3});
        let out = r.rewrite_tree(&doc);
        let keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "name", "m"]);
    }

    #[test]
    fn test_reset_and_preload() {
        let r = replacer();
        r.get_or_create(&PiiCategory::Name, "홍길동");
        let snapshot = r.ledger_snapshot();
        r.reset();
        assert!(r.ledger().is_empty());

        assert_eq!(r.preload(snapshot.clone()), 1);
        assert_eq!(r.ledger_snapshot(), snapshot);
    }

    #[test]
    fn test_preloaded_mapping_takes_precedence() {
        let r = replacer();
        let other = Ledger::new();
        other.insert_if_absent(&PiiCategory::Name, "홍길동", "테스트개인1".into());
        r.preload(other.snapshot());

        assert_eq!(r.get_or_create(&PiiCategory::Name, "홍길동"), "테스트개인1");
    }

    #[test]
    fn test_rewrite_tree_reports_query_and_percent_substitutions() {
        let r = replacer();
        let doc = json!({
            "request": {"url": "/api/users?name=%ED%99%8D%EA%B8%B8%EB%8F%99&page=1"},
            "encoded": {"name": "%EA%B9%80%EC%B2%A0%EC%88%98"},
            "phone": "010-1234-5678"
        });

        let (out, found) = r.rewrite_tree_with_detections(&doc);

        let paths: Vec<_> = found.iter().map(|d| d.location()).collect();
        assert_eq!(paths, vec!["request.url?name", "encoded.name", "phone"]);
        assert_eq!(found[0].value, "홍길동");
        assert_eq!(found[1].value, "김철수");
        assert_eq!(out, r.rewrite_tree(&doc));
        assert_eq!(r.ledger().len(), 3);
    }

    #[test]
    fn test_detect_tree_matches_rewrite_without_recording() {
        let r = replacer();
        let doc = json!({"url": "https://x/y?name=%ED%99%8D%EA%B8%B8%EB%8F%99", "nm": "홍길동"});

        let detected = r.detect_tree(&doc);
        assert!(r.ledger().is_empty());

        let (_, rewritten) = r.rewrite_tree_with_detections(&doc);
        assert_eq!(detected, rewritten);
    }

    #[test]
    fn test_double_encoded_query_param_is_decoded_once() {
        let r = replacer();
        // Decoding once leaves "%ED%99%8D...", which no name rule accepts
        let url = "/api/users?name=%25ED%2599%258D%25EA%25B8%25B8%25EB%258F%2599";
        let (value, changed) = r.rewrite_value(&json!(url), "url");
        assert!(!changed);
        assert_eq!(value, json!(url));
        assert!(r.ledger().is_empty());
    }
}
