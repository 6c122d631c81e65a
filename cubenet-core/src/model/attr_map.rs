use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Insertion-order-preserving attribute map with upper-cased keys.
///
/// Cube attribute names are case-insensitive, so every access path
/// normalizes the key to upper case. Re-setting an existing key keeps its
/// original position (last write wins per key), which is what lets a
/// re-serialized record keep the attribute order of its source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttrMap(IndexMap<String, String>);

impl AttrMap {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_uppercase(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(&key.to_uppercase()).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(&key.to_uppercase())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        // shift_remove keeps the relative order of the remaining keys
        self.0.shift_remove(&key.to_uppercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// numeric view of an attribute; absent or non-numeric values are None.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.trim().parse::<f64>().ok())
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for AttrMap {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        let mut map = AttrMap::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

impl fmt::Display for AttrMap {
    /// comma-joined `KEY=value` fields in insertion order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (k, v) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", k, quote_if_needed(v))?;
            first = false;
        }
        Ok(())
    }
}

/// A value may be written bare only if the lexer reads it back as a single
/// word or number token: alphanumerics plus `_` and `.`. A `-` or `,` in a
/// bare value would fuse with or split off the following tokens on
/// re-parse, so those get re-quoted.
pub(crate) fn quote_if_needed(value: &str) -> String {
    let bare = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if bare {
        value.to_string()
    } else {
        format!("\"{value}\"")
    }
}

#[cfg(test)]
mod test {
    use super::AttrMap;

    #[test]
    fn test_keys_are_upper_cased() {
        let mut attrs = AttrMap::new();
        attrs.set("headway[1]", "10");
        assert_eq!(attrs.get("HEADWAY[1]"), Some("10"));
        assert_eq!(attrs.get("Headway[1]"), Some("10"));
        assert!(attrs.contains("headway[1]"));
    }

    #[test]
    fn test_last_write_wins_in_place() {
        let mut attrs = AttrMap::new();
        attrs.set("MODE", "5");
        attrs.set("ONEWAY", "T");
        attrs.set("mode", "7");
        let keys: Vec<&str> = attrs.keys().collect();
        assert_eq!(keys, vec!["MODE", "ONEWAY"]);
        assert_eq!(attrs.get("MODE"), Some("7"));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let attrs: AttrMap = [("b", "2"), ("a", "1"), ("c", "3")].into_iter().collect();
        let keys: Vec<&str> = attrs.keys().collect();
        assert_eq!(keys, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_display_requotes_multi_token_values() {
        let attrs: AttrMap = [
            ("LONGNAME", "SIMON-SAYS"),
            ("USERA1", "10,20"),
            ("MODE", "5"),
            ("RUNTIME", "7.5"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            attrs.to_string(),
            "LONGNAME=\"SIMON-SAYS\", USERA1=\"10,20\", MODE=5, RUNTIME=7.5"
        );
    }

    #[test]
    fn test_get_f64() {
        let attrs: AttrMap = [("HEADWAY[1]", "12.5"), ("NAME", "blue")]
            .into_iter()
            .collect();
        assert_eq!(attrs.get_f64("HEADWAY[1]"), Some(12.5));
        assert_eq!(attrs.get_f64("NAME"), None);
        assert_eq!(attrs.get_f64("MISSING"), None);
    }
}
