//! Ordered header of key/value/comment entries.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Int(v) => write!(f, "{v}"),
            HeaderValue::Float(v) => write!(f, "{v}"),
            HeaderValue::Bool(v) => write!(f, "{v}"),
            HeaderValue::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for HeaderValue {
    fn from(v: i64) -> Self {
        HeaderValue::Int(v)
    }
}

impl From<f64> for HeaderValue {
    fn from(v: f64) -> Self {
        HeaderValue::Float(v)
    }
}

impl From<bool> for HeaderValue {
    fn from(v: bool) -> Self {
        HeaderValue::Bool(v)
    }
}

impl From<&str> for HeaderValue {
    fn from(v: &str) -> Self {
        HeaderValue::Text(v.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(v: String) -> Self {
        HeaderValue::Text(v)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderEntry {
    pub key: String,
    pub value: HeaderValue,
    pub comment: String,
}

/// Header entries in insertion order. Re-adding an existing key replaces its
/// value and comment in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    entries: Vec<HeaderEntry>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(
        &mut self,
        key: impl Into<String>,
        value: impl Into<HeaderValue>,
        comment: impl Into<String>,
    ) {
        let key = key.into();
        let value = value.into();
        let comment = comment.into();
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => {
                entry.value = value;
                entry.comment = comment;
            }
            None => self.entries.push(HeaderEntry {
                key,
                value,
                comment,
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            write!(f, "{:<24} = {}", entry.key, entry.value)?;
            if !entry.comment.is_empty() {
                write!(f, " / {}", entry.comment)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_insertion_order() {
        let mut head = Header::new();
        head.add_entry("Instrument.name", "ULTRACAM", "instrument");
        head.add_entry("Run.exposure", 2.5, "seconds");
        head.add_entry("Instrument.name", "ULTRASPEC", "");

        let keys: Vec<&str> = head.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["Instrument.name", "Run.exposure"]);
        assert_eq!(
            head.get("Instrument.name"),
            Some(&HeaderValue::Text("ULTRASPEC".to_string()))
        );
        assert_eq!(head.len(), 2);
    }

    #[test]
    fn test_display_includes_comments() {
        let mut head = Header::new();
        head.add_entry("Run.number", 45i64, "run index");
        let text = head.to_string();
        assert!(text.contains("Run.number"));
        assert!(text.contains("45 / run index"));
    }
}
