use indexmap::IndexMap;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use thiserror::Error;

/// Errors raised while reading a language file
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Language file is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("Malformed language file: {0}")]
    Syntax(#[from] serde_json::Error),
}

/// Matches one `"key": "value"` pair using the JSON string escape grammar
/// for both sides.
///
/// Capture groups:
/// 1. raw key body (still escaped)
/// 2. separator between the closing key quote and the opening value quote
/// 3. raw value body (still escaped)
static ENTRY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let string_body = r#"(?:\\["\\/bfnrt]|\\u[0-9a-fA-F]{4}|[^"\\])*"#;
    Regex::new(&format!(r#""({string_body})"(\s*:\s*)"({string_body})""#))
        .expect("Invalid language entry regex")
});

/// Flat, ordered key -> string map parsed from a `<locale>.json` language file.
///
/// Iteration order is the order of the keys in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceMap {
    entries: IndexMap<String, String>,
}

impl ResourceMap {
    /// Parse a language file.
    ///
    /// The document must be a JSON object whose values are all strings. A
    /// leading byte-order mark is ignored. Duplicate keys keep their first
    /// position and the last value.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let entries: IndexMap<String, String> = serde_json::from_str(text)?;
        Ok(Self { entries })
    }

    /// Parse raw file bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        Self::parse(decode(bytes)?)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries whose value differs from `reference` for the same key.
    ///
    /// Keys the reference does not know are kept.
    pub fn translations_against(&self, reference: &ResourceMap) -> ResourceMap {
        self.iter()
            .filter(|(key, value)| reference.get(key) != Some(*value))
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }
}

impl FromIterator<(String, String)> for ResourceMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Interpret language file bytes as UTF-8 text.
pub fn decode(bytes: &[u8]) -> Result<&str, FormatError> {
    Ok(std::str::from_utf8(bytes)?)
}

/// Replace the values of `source_text` with the ones in `overrides`.
///
/// Only the value part of a matched pair is rewritten; the raw key text, the
/// separator and everything outside the pairs stay byte-for-byte identical.
/// Pairs whose key is not overridden, or whose decoded value already equals
/// the override, are left untouched.
pub fn substitute_values(source_text: &str, overrides: &ResourceMap) -> String {
    if overrides.is_empty() {
        return source_text.to_string();
    }

    ENTRY_PATTERN
        .replace_all(source_text, |caps: &Captures| {
            let original = caps[0].to_string();
            let Some(key) = unescape(&caps[1]) else {
                return original;
            };
            let Some(replacement) = overrides.get(&key) else {
                return original;
            };
            if unescape(&caps[3]).as_deref() == Some(replacement) {
                return original;
            }
            format!("\"{}\"{}\"{}\"", &caps[1], &caps[2], escape(replacement))
        })
        .into_owned()
}

/// Decode the body of a JSON string literal (without its quotes).
fn unescape(raw: &str) -> Option<String> {
    serde_json::from_str(&format!("\"{raw}\"")).ok()
}

/// Encode a value as the body of a JSON string literal (without its quotes).
fn escape(value: &str) -> String {
    let quoted = serde_json::Value::String(value.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> ResourceMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_preserves_order() {
        let parsed = ResourceMap::parse(r#"{"z.last": "Z", "a.first": "A", "m.mid": "M"}"#).unwrap();
        let keys: Vec<&str> = parsed.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z.last", "a.first", "m.mid"]);
    }

    #[test]
    fn test_parse_decodes_escapes() {
        let parsed =
            ResourceMap::parse(r#"{"k": "quote \" slash \/ back \\ tab \t nl \n é"}"#).unwrap();
        assert_eq!(parsed.get("k"), Some("quote \" slash / back \\ tab \t nl \n é"));
    }

    #[test]
    fn test_parse_ignores_bom() {
        let parsed = ResourceMap::parse("\u{feff}{\"a\": \"b\"}").unwrap();
        assert_eq!(parsed.get("a"), Some("b"));
    }

    #[test]
    fn test_parse_rejects_unterminated_string() {
        let err = ResourceMap::parse(r#"{"a": "b}"#).unwrap_err();
        assert!(matches!(err, FormatError::Syntax(_)));
    }

    #[test]
    fn test_parse_rejects_invalid_escape() {
        assert!(ResourceMap::parse(r#"{"a": "bad \q escape"}"#).is_err());
    }

    #[test]
    fn test_parse_rejects_non_string_values() {
        assert!(ResourceMap::parse(r#"{"a": 1}"#).is_err());
        assert!(ResourceMap::parse(r#"["a"]"#).is_err());
    }

    #[test]
    fn test_from_bytes_rejects_invalid_utf8() {
        let err = ResourceMap::from_bytes(&[b'{', 0xff, b'}']).unwrap_err();
        assert!(matches!(err, FormatError::Encoding(_)));
    }

    #[test]
    fn test_substitute_replaces_only_overridden_keys() {
        let source = "{\n  \"a.b\": \"Hello %s\",\n  \"a.c\": \"World\"\n}";
        let merged = substitute_values(source, &map(&[("a.b", "Olá %s")]));
        assert_eq!(merged, "{\n  \"a.b\": \"Olá %s\",\n  \"a.c\": \"World\"\n}");
    }

    #[test]
    fn test_substitute_preserves_separator_and_comments() {
        let source = "{\n  // header\n  \"a\"  :\t\"x\"\n}";
        let merged = substitute_values(source, &map(&[("a", "y")]));
        assert_eq!(merged, "{\n  // header\n  \"a\"  :\t\"y\"\n}");
    }

    #[test]
    fn test_substitute_escapes_replacement() {
        let source = r#"{"a": "x"}"#;
        let merged = substitute_values(source, &map(&[("a", "say \"hi\"\nnow\\")]));
        assert_eq!(merged, r#"{"a": "say \"hi\"\nnow\\"}"#);
        assert_eq!(
            ResourceMap::parse(&merged).unwrap().get("a"),
            Some("say \"hi\"\nnow\\")
        );
    }

    #[test]
    fn test_substitute_matches_escaped_keys() {
        let source = r#"{"quote\"key": "x", "plain": "y"}"#;
        let merged = substitute_values(source, &map(&[("quote\"key", "z")]));
        assert_eq!(merged, r#"{"quote\"key": "z", "plain": "y"}"#);
    }

    #[test]
    fn test_substitute_keeps_equal_values_verbatim() {
        let source = r#"{"a": "café"}"#;
        let merged = substitute_values(source, &map(&[("a", "café")]));
        assert_eq!(merged, source);
    }

    #[test]
    fn test_substitute_empty_overrides_is_identity() {
        let source = "{\n  \"a\": \"b\"\n}\n";
        assert_eq!(substitute_values(source, &ResourceMap::default()), source);
    }

    #[test]
    fn test_translations_against() {
        let target = map(&[("a", "Olá"), ("b", "World"), ("c", "Novo")]);
        let reference = map(&[("a", "Hello"), ("b", "World")]);
        let translations = target.translations_against(&reference);
        assert_eq!(translations, map(&[("a", "Olá"), ("c", "Novo")]));
    }
}
