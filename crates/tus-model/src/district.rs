//! Geographic reference: composite district codes to state and district names.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use tus_common::{canonical_code_str, strip_leading_zeros};

/// State label written when a composite key has no reference entry.
pub const UNKNOWN_STATE: &str = "Unknown State";
/// District label used when any part of the composite key is missing.
pub const UNKNOWN_DISTRICT: &str = "Unknown District";

/// Composite lookup key `(sub-region, district, state)`.
///
/// The sub-region part is empty for surveys whose reference table is keyed
/// by state and district only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DistrictKey {
    pub sub_region: String,
    pub district: String,
    pub state: String,
}

impl fmt::Display for DistrictKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.sub_region, self.district, self.state)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictName {
    pub state_name: String,
    pub district_name: String,
}

/// A composite key that appeared more than once in the reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateDistrictKey {
    pub key: DistrictKey,
    /// The mapping that won (the last one seen).
    pub kept: DistrictName,
    pub occurrences: usize,
}

/// Lookup table built once per run from the geographic reference.
///
/// Duplicate keys are not an error: the last row wins and the key is kept
/// for the audit log.
#[derive(Debug, Clone, Default)]
pub struct DistrictTable {
    entries: HashMap<DistrictKey, DistrictName>,
    occurrences: BTreeMap<DistrictKey, usize>,
    strip_leading_zeros: bool,
}

impl DistrictTable {
    /// Create an empty table. With `strip_leading_zeros`, key parts compare
    /// as integers (`"07"` and `"7"` address the same entry) on both the
    /// reference and the lookup side.
    pub fn new(strip_leading_zeros: bool) -> Self {
        Self {
            entries: HashMap::new(),
            occurrences: BTreeMap::new(),
            strip_leading_zeros,
        }
    }

    /// Normalize raw key parts with this table's policy.
    pub fn key(&self, sub_region: &str, district: &str, state: &str) -> DistrictKey {
        DistrictKey {
            sub_region: self.normalize_part(sub_region),
            district: self.normalize_part(district),
            state: self.normalize_part(state),
        }
    }

    fn normalize_part(&self, raw: &str) -> String {
        let canonical = canonical_code_str(raw);
        if self.strip_leading_zeros {
            strip_leading_zeros(&canonical)
        } else {
            canonical
        }
    }

    /// Insert a reference row. Returns `true` when the key was already present.
    pub fn insert(
        &mut self,
        sub_region: &str,
        district: &str,
        state: &str,
        name: DistrictName,
    ) -> bool {
        let key = self.key(sub_region, district, state);
        let count = self.occurrences.entry(key.clone()).or_insert(0);
        *count += 1;
        let duplicate = *count > 1;
        self.entries.insert(key, name);
        duplicate
    }

    pub fn get(&self, key: &DistrictKey) -> Option<&DistrictName> {
        self.entries.get(key)
    }

    /// Keys seen more than once, in key order.
    pub fn duplicates(&self) -> Vec<DuplicateDistrictKey> {
        self.occurrences
            .iter()
            .filter(|(_, count)| **count > 1)
            .filter_map(|(key, count)| {
                self.entries.get(key).map(|kept| DuplicateDistrictKey {
                    key: key.clone(),
                    kept: kept.clone(),
                    occurrences: *count,
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
