//! Operator operations: status, listing, lookup, set/unset, template, and
//! the `StoreResult` enum that callers use to display results.
//!
//! Set and unset only touch declared keys. An undeclared key is rejected
//! before the store is written, since the next reconciliation would drop it
//! anyway.

use std::fmt;
use std::path::PathBuf;

use crate::error::LocalVarsError;
use crate::format;
use crate::reconcile::{self, DeclaredKeys, Mapping, ReconciliationState};
use crate::resolve::Reconciled;
use crate::store::Store;
use crate::types::StoreFormat;

const NOT_SET: &str = "<not set>";

/// Result of a store operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreResult {
    /// Readiness of the store after reconciliation.
    Status {
        state: ReconciliationState,
        path: PathBuf,
        missing: Vec<String>,
    },
    /// Every declared key with its value (or `<not set>`).
    Listing { entries: Vec<(String, String)> },
    /// One key's value.
    KeyValue { key: String, value: String },
    /// Confirmation that a value was written. The value itself is not echoed.
    ValueSet { key: String },
    /// Confirmation that a value was blanked.
    ValueUnset { key: String },
    /// A blank document for the declared keys.
    Template(String),
}

impl fmt::Display for StoreResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreResult::Status {
                state,
                path,
                missing,
            } => {
                write!(f, "{}: {}", path.display(), state.message())?;
                if !missing.is_empty() {
                    write!(f, "\nmissing: {}", missing.join(", "))?;
                }
                Ok(())
            }
            StoreResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
            StoreResult::KeyValue { key, value } => write!(f, "{key} = {value}"),
            StoreResult::ValueSet { key } => write!(f, "Set {key}"),
            StoreResult::ValueUnset { key } => write!(f, "Unset {key}"),
            StoreResult::Template(t) => write!(f, "{t}"),
        }
    }
}

pub fn status(reconciled: &Reconciled) -> StoreResult {
    StoreResult::Status {
        state: reconciled.state,
        path: reconciled.path.clone(),
        missing: reconciled.missing(),
    }
}

/// List the mapping in its stored order.
pub fn list_values(mapping: &Mapping) -> StoreResult {
    let entries = mapping
        .iter()
        .map(|(key, value)| (key.clone(), display_value(value)))
        .collect();
    StoreResult::Listing { entries }
}

pub fn get_value(
    mapping: &Mapping,
    keys: &DeclaredKeys,
    key: &str,
) -> Result<StoreResult, LocalVarsError> {
    ensure_declared(keys, key)?;
    let value = mapping.get(key).map(String::as_str).unwrap_or_default();
    Ok(StoreResult::KeyValue {
        key: key.into(),
        value: display_value(value),
    })
}

/// Write `value` for a declared key and save the store.
pub fn set_value(
    store: &Store,
    mut mapping: Mapping,
    keys: &DeclaredKeys,
    key: &str,
    value: &str,
) -> Result<StoreResult, LocalVarsError> {
    ensure_declared(keys, key)?;
    mapping.insert(key.into(), value.into());
    store.save(&mapping)?;
    Ok(StoreResult::ValueSet { key: key.into() })
}

/// Blank a declared key's value. The key stays in the store.
pub fn unset_value(
    store: &Store,
    mut mapping: Mapping,
    keys: &DeclaredKeys,
    key: &str,
) -> Result<StoreResult, LocalVarsError> {
    ensure_declared(keys, key)?;
    mapping.insert(key.into(), String::new());
    store.save(&mapping)?;
    Ok(StoreResult::ValueUnset { key: key.into() })
}

/// Render the blank document a fresh store would start from.
pub fn generate_template(keys: &DeclaredKeys, format: StoreFormat) -> String {
    format::render_document(&reconcile::blank_mapping(keys), None, format)
}

fn ensure_declared(keys: &DeclaredKeys, key: &str) -> Result<(), LocalVarsError> {
    if keys.contains(key) {
        Ok(())
    } else {
        Err(LocalVarsError::UnknownKey(key.into()))
    }
}

fn display_value(value: &str) -> String {
    if value.is_empty() {
        NOT_SET.to_string()
    } else {
        value.to_string()
    }
}
