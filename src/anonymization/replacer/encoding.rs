//! URL and percent-encoding helpers for the replacer
//!
//! Values are split by hand instead of going through `url::Url`, so relative
//! references such as `/api/users?name=...` (the usual Wiremock `url` field)
//! are handled the same way as absolute URLs.

use std::borrow::Cow;
use thiserror::Error;
use url::form_urlencoded;

/// Keys whose values are always treated as URLs
const URL_KEYS: [&str; 3] = ["url", "uri", "endpoint"];

/// A value the replacer could not decode; it falls through to the next path
#[derive(Debug, Error)]
pub(crate) enum DecodeSkipped {
    #[error("percent-decoded bytes are not valid UTF-8: {0}")]
    InvalidUtf8(String),
}

/// Whether `value` stored under `key` should go through query rewriting
pub(crate) fn is_url_candidate(value: &str, key: &str) -> bool {
    value.contains('?') || URL_KEYS.iter().any(|k| key.eq_ignore_ascii_case(k))
}

/// A URL split into the part before `?`, the query and the fragment
#[derive(Debug, PartialEq)]
pub(crate) struct UrlParts<'a> {
    pub base: &'a str,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

impl<'a> UrlParts<'a> {
    pub fn split(value: &'a str) -> Self {
        let (rest, fragment) = match value.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (value, None),
        };
        let (base, query) = match rest.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (rest, None),
        };
        Self {
            base,
            query,
            fragment,
        }
    }

    /// Reassemble with a new query string
    pub fn join(&self, query: &str) -> String {
        let mut out = String::with_capacity(self.base.len() + query.len() + 2);
        out.push_str(self.base);
        out.push('?');
        out.push_str(query);
        if let Some(fragment) = self.fragment {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }
}

/// Rewrite the query parameters of `value`.
///
/// `substitute` receives each decoded `(name, value)` pair and returns the
/// replacement for the value, if any. Returns `None` when the value has no
/// query or no parameter was substituted, so the caller can fall through.
pub(crate) fn rewrite_query<F>(value: &str, mut substitute: F) -> Option<String>
where
    F: FnMut(&str, &str) -> Option<String>,
{
    let parts = UrlParts::split(value);
    let query = parts.query.filter(|q| !q.is_empty())?;

    let mut changed = false;
    let params: Vec<(Cow<'_, str>, Cow<'_, str>)> = form_urlencoded::parse(query.as_bytes())
        .map(|(name, param)| match substitute(&*name, &*param) {
            Some(replacement) => {
                changed = true;
                (name, Cow::Owned(replacement))
            }
            None => (name, param),
        })
        .collect();

    if !changed {
        return None;
    }

    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    Some(parts.join(&encoded))
}

/// Percent-decode `value`.
///
/// `Ok(None)` means decoding does not change the value.
pub(crate) fn percent_decode(value: &str) -> Result<Option<String>, DecodeSkipped> {
    if !value.contains('%') {
        return Ok(None);
    }
    match urlencoding::decode(value) {
        Ok(decoded) if decoded != value => Ok(Some(decoded.into_owned())),
        Ok(_) => Ok(None),
        Err(e) => Err(DecodeSkipped::InvalidUtf8(e.to_string())),
    }
}

/// Percent-encode every byte except unreserved characters
pub(crate) fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_candidate() {
        assert!(is_url_candidate("/api?x=1", "anything"));
        assert!(is_url_candidate("/api/users", "URL"));
        assert!(is_url_candidate("/api/users", "endpoint"));
        assert!(!is_url_candidate("/api/users", "urlPattern"));
        assert!(!is_url_candidate("홍길동", "name"));
    }

    #[test]
    fn test_split_parts() {
        let parts = UrlParts::split("https://x/y?a=1&b=2#top");
        assert_eq!(parts.base, "https://x/y");
        assert_eq!(parts.query, Some("a=1&b=2"));
        assert_eq!(parts.fragment, Some("top"));

        let relative = UrlParts::split("/api/users");
        assert_eq!(relative.query, None);
        assert_eq!(relative.fragment, None);
    }

    #[test]
    fn test_rewrite_query_substitutes_matching_params() {
        let out = rewrite_query("/api/users?name=%ED%99%8D%EA%B8%B8%EB%8F%99&page=1#f", |name, value| {
            (name == "name" && value == "홍길동").then(|| "테스트개인1".to_string())
        })
        .unwrap();

        assert!(out.starts_with("/api/users?name="));
        assert!(out.ends_with("&page=1#f"));
        let (_, query) = out.split_once('?').unwrap();
        let decoded: Vec<_> = form_urlencoded::parse(query.trim_end_matches("#f").as_bytes())
            .into_owned()
            .collect();
        assert_eq!(decoded[0], ("name".to_string(), "테스트개인1".to_string()));
    }

    #[test]
    fn test_rewrite_query_without_match_is_none() {
        assert_eq!(rewrite_query("/api?page=1", |_, _| None), None);
        assert_eq!(rewrite_query("/api/users", |_, _| Some("x".into())), None);
        assert_eq!(rewrite_query("/api?", |_, _| Some("x".into())), None);
    }

    #[test]
    fn test_rewrite_query_keeps_repeated_params_in_order() {
        let out = rewrite_query("/s?tag=a&phone=1&tag=b", |name, _| {
            (name == "phone").then(|| "2".to_string())
        })
        .unwrap();
        assert_eq!(out, "/s?tag=a&phone=2&tag=b");
    }

    #[test]
    fn test_percent_round_trip() {
        let encoded = percent_encode("홍길동");
        assert_eq!(encoded, "%ED%99%8D%EA%B8%B8%EB%8F%99");
        assert_eq!(percent_decode(&encoded).unwrap(), Some("홍길동".to_string()));
    }

    #[test]
    fn test_percent_encode_leaves_unreserved() {
        assert_eq!(percent_encode("a-b_c.d~e f"), "a-b_c.d~e%20f");
    }

    #[test]
    fn test_percent_decode_edge_cases() {
        assert_eq!(percent_decode("plain").unwrap(), None);
        // A lone `%` decodes to itself
        assert_eq!(percent_decode("100%").unwrap(), None);
        assert!(matches!(
            percent_decode("%FF%FE"),
            Err(DecodeSkipped::InvalidUtf8(_))
        ));
    }
}
