//! Pattern-driven identifier

use super::{patterns::PatternSet, PiiDetector};
use crate::anonymization::models::Identification;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;

/// Identifier backed by a compiled [`PatternSet`]
#[derive(Debug, Clone)]
pub struct PatternIdentifier {
    patterns: Arc<PatternSet>,
}

impl PatternIdentifier {
    /// Create an identifier over `patterns`
    pub fn new(patterns: PatternSet) -> Self {
        Self {
            patterns: Arc::new(patterns),
        }
    }

    /// Create an identifier with the built-in rules
    pub fn with_default_patterns() -> crate::domain::Result<Self> {
        Ok(Self::new(PatternSet::default_patterns()?))
    }

    /// Compiled rules
    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    fn walk(&self, value: &Value, path: &str, key: &str, found: &mut Vec<Identification>) {
        match value {
            Value::Object(map) => {
                for (child_key, child) in map {
                    let child_path = if path.is_empty() {
                        child_key.clone()
                    } else {
                        format!("{path}.{child_key}")
                    };
                    self.walk(child, &child_path, child_key, found);
                }
            }
            Value::Array(items) => {
                // Scalar elements are looked up with the sequence's own key
                for (idx, item) in items.iter().enumerate() {
                    self.walk(item, &format!("{path}[{idx}]"), key, found);
                }
            }
            scalar => {
                if let Some(identification) = self.identify(scalar, key) {
                    found.push(identification.with_path(path));
                }
            }
        }
    }
}

impl PiiDetector for PatternIdentifier {
    fn identify(&self, value: &Value, key: &str) -> Option<Identification> {
        let text = scalar_text(value)?;
        self.identify_str(&text, key)
    }

    fn identify_str(&self, value: &str, key: &str) -> Option<Identification> {
        if key.is_empty() {
            return None;
        }

        self.patterns
            .rules()
            .iter()
            .find(|rule| rule.matches_key(key) && rule.matches_value(value))
            .map(|rule| Identification::new(rule.category().clone(), value.to_string(), key.to_string()))
    }

    fn identify_tree(&self, document: &Value) -> Vec<Identification> {
        let mut found = Vec::new();
        self.walk(document, "", "", &mut found);
        tracing::debug!(detections = found.len(), "Scanned document");
        found
    }
}

/// String form of a scalar JSON value; `None` for null and containers
pub fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::detector::PatternDefinition;
    use crate::anonymization::models::PiiCategory;
    use serde_json::json;

    fn identifier() -> PatternIdentifier {
        let defs = vec![
            PatternDefinition::new(&["^name$", "^nm$"], "name", Some("^[가-힣]{2,4}$")),
            PatternDefinition::new(&["^phone$"], "phone", Some(r"^01[0-9]-\d{3,4}-\d{4}$")),
            PatternDefinition::new(&["account"], "account_number", Some(r"^\d{10,20}$")),
        ];
        PatternIdentifier::new(PatternSet::compile(&defs).unwrap())
    }

    #[test]
    fn test_identify_name() {
        let found = identifier().identify(&json!("홍길동"), "name").unwrap();
        assert_eq!(found.category, PiiCategory::Name);
        assert_eq!(found.value, "홍길동");
        assert_eq!(found.key, "name");
    }

    #[test]
    fn test_identify_abbreviated_key() {
        let found = identifier().identify(&json!("홍길동"), "nm").unwrap();
        assert_eq!(found.category, PiiCategory::Name);
    }

    #[test]
    fn test_value_pattern_must_match() {
        assert!(identifier().identify(&json!("John"), "name").is_none());
        assert!(identifier().identify(&json!("02-123"), "phone").is_none());
    }

    #[test]
    fn test_empty_key_never_matches() {
        assert!(identifier().identify(&json!("홍길동"), "").is_none());
    }

    #[test]
    fn test_numbers_are_coerced() {
        let found = identifier()
            .identify(&json!(12345678901_u64), "account_no")
            .unwrap();
        assert_eq!(found.category, PiiCategory::AccountNumber);
        assert_eq!(found.value, "12345678901");
    }

    #[test]
    fn test_null_and_containers_are_not_identified() {
        let id = identifier();
        assert!(id.identify(&Value::Null, "name").is_none());
        assert!(id.identify(&json!(["홍길동"]), "name").is_none());
        assert!(id.identify(&json!({"a": 1}), "name").is_none());
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let defs = vec![
            PatternDefinition::new(&["name"], "name", None),
            PatternDefinition::new(&["company"], "company_name", None),
        ];
        let id = PatternIdentifier::new(PatternSet::compile(&defs).unwrap());
        let found = id.identify(&json!("ACME"), "company_name").unwrap();
        assert_eq!(found.category, PiiCategory::Name);
    }

    #[test]
    fn test_identify_tree_paths() {
        let doc = json!({
            "user": {
                "name": "홍길동",
                "contact": {"phone": "010-1234-5678"}
            },
            "users": [
                {"nm": "김철수"},
                {"age": 30}
            ],
            "name": ["이영희", "abc"],
            "age": 30
        });

        let found = identifier().identify_tree(&doc);
        let paths: Vec<_> = found.iter().map(|f| f.location().to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "user.name",
                "user.contact.phone",
                "users[0].nm",
                "name[0]",
            ]
        );
        assert_eq!(found[3].key, "name");
    }

    #[test]
    fn test_identify_tree_does_not_mutate() {
        let doc = json!({"name": "홍길동"});
        let before = doc.clone();
        let _ = identifier().identify_tree(&doc);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_identify_tree_root_array() {
        let doc = json!([{"name": "홍길동"}, "홍길동"]);
        let found = identifier().identify_tree(&doc);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].location(), "[0].name");
    }
}
