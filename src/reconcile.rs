//! Reconciliation engine: compare declared keys with a persisted mapping.
//!
//! Everything here operates on in-memory data. The orchestration pipeline
//! ([`resolve`](crate::resolve)) does the loading and saving around it.
//!
//! Checks run in a fixed order, and the first one that applies wins:
//!
//! 1. No persisted mapping → [`Absent`](ReconciliationState::Absent)
//! 2. Key sets differ → [`KeyMismatch`](ReconciliationState::KeyMismatch)
//! 3. Some value is `""` → [`Incomplete`](ReconciliationState::Incomplete)
//! 4. Otherwise → [`Ready`](ReconciliationState::Ready)

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;

/// A flat key → value mapping. Insertion order is kept so documents follow
/// the declared key order.
pub type Mapping = IndexMap<String, String>;

/// The ordered set of key names a program requires.
///
/// Duplicates are dropped on construction (first occurrence wins).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredKeys(Vec<String>);

impl DeclaredKeys {
    /// # Panics
    ///
    /// Panics if `keys` is empty or contains an empty name. Both are caller
    /// bugs, not runtime conditions.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for key in keys {
            let key = key.into();
            assert!(!key.is_empty(), "localvars: declared key names must not be empty");
            if !unique.contains(&key) {
                unique.push(key);
            }
        }
        assert!(!unique.is_empty(), "localvars: supply at least one declared key");
        Self(unique)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|k| k == key)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Readiness of a store relative to the declared keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconciliationState {
    /// No store existed; a blank one was scaffolded.
    Absent,
    /// The store's keys differ from the declared keys.
    KeyMismatch,
    /// Keys match but at least one value is blank.
    Incomplete,
    /// Keys match and every value is set.
    Ready,
}

impl ReconciliationState {
    /// Operator-facing description of the state.
    pub fn message(&self) -> &'static str {
        match self {
            ReconciliationState::Absent => {
                "New store created with keys. Add their values and try again."
            }
            ReconciliationState::KeyMismatch => {
                "Store keys differ from the declared keys. Keys were added/removed. Add the values and try again."
            }
            ReconciliationState::Incomplete => {
                "Store keys are set up. Some values are missing, please add them and try again."
            }
            ReconciliationState::Ready => "All values are set.",
        }
    }

    /// Whether the merged mapping differs from what is on disk and must be saved.
    pub fn needs_persist(&self) -> bool {
        matches!(
            self,
            ReconciliationState::Absent | ReconciliationState::KeyMismatch
        )
    }

    pub fn is_ready(&self) -> bool {
        *self == ReconciliationState::Ready
    }
}

impl fmt::Display for ReconciliationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReconciliationState::Absent => "absent",
            ReconciliationState::KeyMismatch => "key-mismatch",
            ReconciliationState::Incomplete => "incomplete",
            ReconciliationState::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub state: ReconciliationState,
    /// The mapping to persist (or, when ready, the resolved mapping).
    pub mapping: Mapping,
    /// Declared keys the store did not have.
    pub added: Vec<String>,
    /// Stored keys that are no longer declared and were removed.
    pub dropped: Vec<String>,
    /// Subset of `dropped` whose values were non-empty.
    pub discarded: Vec<String>,
}

/// Classify `persisted` against `keys` and compute the mapping to persist.
///
/// `None` means the store does not exist yet. For `Incomplete` and `Ready`
/// the persisted mapping is moved through untouched.
pub fn classify(keys: &DeclaredKeys, persisted: Option<Mapping>) -> Reconciliation {
    let Some(existing) = persisted else {
        return Reconciliation {
            state: ReconciliationState::Absent,
            mapping: blank_mapping(keys),
            added: keys.as_slice().to_vec(),
            dropped: vec![],
            discarded: vec![],
        };
    };

    if !keys_equal(existing.keys().map(String::as_str), keys.iter()) {
        let added = keys
            .iter()
            .filter(|k| !existing.contains_key(*k))
            .map(String::from)
            .collect();
        let (dropped, discarded) = removed_keys(&existing, keys);
        return Reconciliation {
            state: ReconciliationState::KeyMismatch,
            mapping: merge(&existing, keys),
            added,
            dropped,
            discarded,
        };
    }

    let state = if has_all_values(&existing) {
        ReconciliationState::Ready
    } else {
        ReconciliationState::Incomplete
    };
    Reconciliation {
        state,
        mapping: existing,
        added: vec![],
        dropped: vec![],
        discarded: vec![],
    }
}

/// Rebuild `existing` around `keys`: keep values of retained keys, blank new
/// keys, drop anything undeclared. Output order follows `keys`.
pub fn merge(existing: &Mapping, keys: &DeclaredKeys) -> Mapping {
    keys.iter()
        .map(|key| {
            let value = existing.get(key).cloned().unwrap_or_default();
            (key.to_string(), value)
        })
        .collect()
}

/// Set equality of two key collections. Order and duplicates are ignored.
pub fn keys_equal<'a>(
    a: impl IntoIterator<Item = &'a str>,
    b: impl IntoIterator<Item = &'a str>,
) -> bool {
    let a: HashSet<&str> = a.into_iter().collect();
    let b: HashSet<&str> = b.into_iter().collect();
    a == b
}

/// True when no value is the empty string. Whitespace counts as a value.
///
/// # Panics
///
/// Panics on an empty mapping.
pub fn has_all_values(mapping: &Mapping) -> bool {
    assert!(
        !mapping.is_empty(),
        "localvars: mapping must contain at least one key"
    );
    mapping.values().all(|v| !v.is_empty())
}

/// Every declared key mapped to `""`.
pub fn blank_mapping(keys: &DeclaredKeys) -> Mapping {
    keys.iter().map(|k| (k.to_string(), String::new())).collect()
}

/// Keys whose value is still `""`, in mapping order.
pub fn missing_values(mapping: &Mapping) -> Vec<String> {
    mapping
        .iter()
        .filter(|(_, v)| v.is_empty())
        .map(|(k, _)| k.clone())
        .collect()
}

fn removed_keys(existing: &Mapping, keys: &DeclaredKeys) -> (Vec<String>, Vec<String>) {
    let mut dropped = Vec::new();
    let mut discarded = Vec::new();
    for (key, value) in existing {
        if keys.contains(key) {
            continue;
        }
        dropped.push(key.clone());
        if !value.is_empty() {
            discarded.push(key.clone());
        }
    }
    (dropped, discarded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{keys, mapping};

    #[test]
    fn absent_scaffolds_blank_mapping() {
        let result = classify(&keys(&["user", "pass"]), None);
        assert_eq!(result.state, ReconciliationState::Absent);
        assert_eq!(result.mapping, mapping(&[("user", ""), ("pass", "")]));
        assert_eq!(result.added, vec!["user", "pass"]);
    }

    #[test]
    fn ready_when_keys_match_and_values_set() {
        let existing = mapping(&[("user", "u"), ("pass", "p")]);
        let result = classify(&keys(&["user", "pass"]), Some(existing.clone()));
        assert_eq!(result.state, ReconciliationState::Ready);
        assert_eq!(result.mapping, existing);
    }

    #[test]
    fn ready_moves_the_mapping_through() {
        let existing = mapping(&[("user", "u"), ("pass", "p")]);
        let buffer = existing["user"].as_ptr();
        let result = classify(&keys(&["pass", "user"]), Some(existing));
        assert_eq!(result.state, ReconciliationState::Ready);
        assert_eq!(result.mapping["user"].as_ptr(), buffer);
        // Stored order is kept; merge would have reordered to the declared order.
        let order: Vec<&str> = result.mapping.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["user", "pass"]);
    }

    #[test]
    fn incomplete_when_a_value_is_blank() {
        let existing = mapping(&[("user", "u"), ("pass", "")]);
        let result = classify(&keys(&["user", "pass"]), Some(existing.clone()));
        assert_eq!(result.state, ReconciliationState::Incomplete);
        assert_eq!(result.mapping, existing);
    }

    #[test]
    fn whitespace_value_counts_as_set() {
        let existing = mapping(&[("user", " "), ("pass", "\t")]);
        let result = classify(&keys(&["user", "pass"]), Some(existing));
        assert_eq!(result.state, ReconciliationState::Ready);
    }

    #[test]
    fn mismatch_adds_new_key_blank() {
        let existing = mapping(&[("user", "u"), ("pass", "p")]);
        let result = classify(&keys(&["user", "pass", "token"]), Some(existing));
        assert_eq!(result.state, ReconciliationState::KeyMismatch);
        assert_eq!(
            result.mapping,
            mapping(&[("user", "u"), ("pass", "p"), ("token", "")])
        );
        assert_eq!(result.added, vec!["token"]);
        assert!(result.dropped.is_empty());
    }

    #[test]
    fn mismatch_drops_undeclared_key() {
        let existing = mapping(&[("user", "u"), ("pass", "p")]);
        let result = classify(&keys(&["user"]), Some(existing));
        assert_eq!(result.state, ReconciliationState::KeyMismatch);
        assert_eq!(result.mapping, mapping(&[("user", "u")]));
        assert_eq!(result.dropped, vec!["pass"]);
        assert_eq!(result.discarded, vec!["pass"]);
    }

    #[test]
    fn mismatch_with_disjoint_keys() {
        let existing = mapping(&[("a", "1"), ("b", "")]);
        let result = classify(&keys(&["c"]), Some(existing));
        assert_eq!(result.state, ReconciliationState::KeyMismatch);
        assert_eq!(result.mapping, mapping(&[("c", "")]));
        assert_eq!(result.dropped, vec!["a", "b"]);
        assert_eq!(result.discarded, vec!["a"]);
    }

    #[test]
    fn mismatch_takes_priority_over_incomplete() {
        let existing = mapping(&[("user", ""), ("pass", "")]);
        let result = classify(&keys(&["user"]), Some(existing));
        assert_eq!(result.state, ReconciliationState::KeyMismatch);
    }

    #[test]
    fn empty_store_is_a_mismatch_not_absent() {
        let result = classify(&keys(&["user"]), Some(Mapping::new()));
        assert_eq!(result.state, ReconciliationState::KeyMismatch);
        assert_eq!(result.mapping, mapping(&[("user", "")]));
    }

    #[test]
    fn merge_keeps_empty_values_of_retained_keys() {
        let existing = mapping(&[("one", ""), ("two", "22")]);
        let merged = merge(&existing, &keys(&["one", "three"]));
        assert_eq!(merged, mapping(&[("one", ""), ("three", "")]));
    }

    #[test]
    fn merge_follows_declared_order() {
        let existing = mapping(&[("one", "1"), ("two", "22")]);
        let merged = merge(&existing, &keys(&["three", "two", "one"]));
        let order: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["three", "two", "one"]);
    }

    #[test]
    fn merge_added_then_removed() {
        let existing = mapping(&[("one", "1"), ("two", "22")]);
        let first = merge(&existing, &keys(&["one", "two", "three"]));
        assert_eq!(first, mapping(&[("one", "1"), ("two", "22"), ("three", "")]));
        let second = merge(&first, &keys(&["one", "three"]));
        assert_eq!(second, mapping(&[("one", "1"), ("three", "")]));
    }

    #[test]
    fn merge_is_idempotent() {
        let existing = mapping(&[("a", "1"), ("b", "2"), ("c", "")]);
        let declared = keys(&["b", "c", "d"]);
        let once = merge(&existing, &declared);
        let twice = merge(&once, &declared);
        assert_eq!(once, twice);
    }

    #[test]
    fn keys_equal_ignores_order() {
        assert!(keys_equal(["a", "b"], ["b", "a"]));
    }

    #[test]
    fn keys_equal_rejects_superset() {
        assert!(!keys_equal(["a", "b"], ["a", "b", "c"]));
        assert!(!keys_equal(["a", "b", "c"], ["a", "b"]));
    }

    #[test]
    fn keys_equal_rejects_renamed_key() {
        assert!(!keys_equal(["args", "to", "test"], ["args", "to", "tes"]));
    }

    #[test]
    fn keys_equal_both_empty() {
        assert!(keys_equal(std::iter::empty::<&str>(), std::iter::empty()));
    }

    #[test]
    fn has_all_values_true_when_set() {
        assert!(has_all_values(&mapping(&[("args", "1"), ("to", "2")])));
    }

    #[test]
    fn has_all_values_false_with_blank() {
        assert!(!has_all_values(&mapping(&[("args", "1"), ("to", "")])));
    }

    #[test]
    #[should_panic(expected = "at least one key")]
    fn has_all_values_rejects_empty_mapping() {
        has_all_values(&Mapping::new());
    }

    #[test]
    #[should_panic(expected = "at least one declared key")]
    fn declared_keys_rejects_empty() {
        DeclaredKeys::new(Vec::<String>::new());
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn declared_keys_rejects_empty_name() {
        DeclaredKeys::new(["user", ""]);
    }

    #[test]
    fn declared_keys_deduplicates() {
        let declared = DeclaredKeys::new(["user", "pass", "user"]);
        assert_eq!(declared.as_slice(), &["user".to_string(), "pass".to_string()]);
    }

    #[test]
    fn blank_mapping_has_declared_keys() {
        let blank = blank_mapping(&keys(&["args", "to", "test"]));
        assert_eq!(blank, mapping(&[("args", ""), ("to", ""), ("test", "")]));
    }

    #[test]
    fn missing_values_lists_blank_keys() {
        let m = mapping(&[("a", "1"), ("b", ""), ("c", "")]);
        assert_eq!(missing_values(&m), vec!["b", "c"]);
    }

    #[test]
    fn only_absent_and_mismatch_need_persist() {
        assert!(ReconciliationState::Absent.needs_persist());
        assert!(ReconciliationState::KeyMismatch.needs_persist());
        assert!(!ReconciliationState::Incomplete.needs_persist());
        assert!(!ReconciliationState::Ready.needs_persist());
    }
}
