//! Code maps: static lookups from categorical survey codes to labels.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tus_common::{canonical_code_str, strip_leading_zeros};

/// Label used for missing values when a map defines no fallback of its own.
pub const DEFAULT_NULL_FALLBACK: &str = "Unknown";

/// A lookup from categorical code to descriptive label.
///
/// Keys are stored in canonical form (see [`tus_common::canonical_code`]),
/// so `"1"` and `"1.0"` address the same entry. A zero-padded code such as
/// `"07"` falls back to the entry for `"7"` when it has none of its own.
/// Codes without an entry
/// resolve to `"Unknown (<code>)"`, which keeps the original value visible
/// in the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCodeMap")]
pub struct CodeMap {
    pub name: String,
    pub entries: BTreeMap<String, String>,
    pub null_fallback: String,
}

#[derive(Deserialize)]
struct RawCodeMap {
    name: String,
    #[serde(default)]
    entries: BTreeMap<String, String>,
    #[serde(default)]
    null_fallback: Option<String>,
}

impl From<RawCodeMap> for CodeMap {
    fn from(raw: RawCodeMap) -> Self {
        let mut map = CodeMap::new(raw.name);
        if let Some(fallback) = raw.null_fallback {
            map.null_fallback = fallback;
        }
        for (code, label) in raw.entries {
            map.insert(&code, label);
        }
        map
    }
}

impl CodeMap {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
            null_fallback: DEFAULT_NULL_FALLBACK.to_string(),
        }
    }

    /// Build a map from `(code, label)` pairs.
    pub fn from_pairs<I, C, L>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, L)>,
        C: AsRef<str>,
        L: Into<String>,
    {
        let mut map = Self::new(name);
        for (code, label) in pairs {
            map.insert(code.as_ref(), label);
        }
        map
    }

    #[must_use]
    pub fn with_null_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.null_fallback = fallback.into();
        self
    }

    pub fn insert(&mut self, code: &str, label: impl Into<String>) {
        self.entries.insert(canonical_code_str(code), label.into());
    }

    /// Look up a code that is already in canonical form.
    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    /// Look up a canonical code, retrying without zero padding on a miss.
    pub fn lookup(&self, code: &str) -> Option<&str> {
        self.get(code).or_else(|| {
            let stripped = strip_leading_zeros(code);
            if stripped == code {
                None
            } else {
                self.get(&stripped)
            }
        })
    }

    /// Resolve an optional canonical code to its output label.
    pub fn resolve(&self, code: Option<&str>) -> String {
        match code {
            None => self.null_fallback.clone(),
            Some(code) => match self.lookup(code) {
                Some(label) => label.to_string(),
                None => Self::unknown_label(code),
            },
        }
    }

    /// Fallback label for a code with no entry.
    pub fn unknown_label(code: &str) -> String {
        format!("Unknown ({code})")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
