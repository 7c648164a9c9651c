//! Orchestration pipeline: ignore → load → classify → persist → report.
//!
//! 1. Make sure the store's file name is listed in the ignore file (if enabled)
//! 2. Load the store (absent is not an error)
//! 3. Classify against the declared keys
//! 4. Persist the merged mapping when the state is `Absent` or `KeyMismatch`
//! 5. Hand back a [`Reconciled`] for the caller to match on
//!
//! Setup-required states are returned as data, not errors. Call
//! [`Reconciled::into_ready`] to turn them into [`SetupRequired`].

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{LocalVarsError, SetupRequired};
use crate::ignore::{self, IgnoreUpdate};
use crate::reconcile::{self, DeclaredKeys, Mapping, ReconciliationState};
use crate::store::Store;

/// Everything the pipeline needs, already resolved to concrete paths.
pub struct ResolveInput {
    pub keys: DeclaredKeys,
    pub store: Store,
    /// Ignore file to keep the store listed in. `None` skips that step.
    pub ignore_file: Option<PathBuf>,
}

/// Result of reconciling a store.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub state: ReconciliationState,
    /// For `Ready`, the resolved values. Otherwise the mapping now on disk.
    pub mapping: Mapping,
    pub path: PathBuf,
    /// Declared keys that were added to the store in this run.
    pub added: Vec<String>,
    /// Keys removed from the store in this run.
    pub dropped: Vec<String>,
    pub ignore: Option<IgnoreUpdate>,
}

impl Reconciled {
    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.mapping.get(key).map(String::as_str)
    }

    /// Keys that still need a value.
    pub fn missing(&self) -> Vec<String> {
        reconcile::missing_values(&self.mapping)
    }

    /// The resolved mapping, or [`LocalVarsError::SetupRequired`] naming the case.
    pub fn into_ready(self) -> Result<Mapping, LocalVarsError> {
        if self.is_ready() {
            return Ok(self.mapping);
        }
        Err(SetupRequired {
            state: self.state,
            missing: reconcile::missing_values(&self.mapping),
            path: self.path,
        }
        .into())
    }
}

/// Run the pipeline against the store.
pub fn resolve(input: &ResolveInput) -> Result<Reconciled, LocalVarsError> {
    let store = &input.store;

    let ignore = match &input.ignore_file {
        Some(ignore_path) => {
            let entry = ignore_entry(ignore_path, store.path());
            Some(ignore::ensure_listed(ignore_path, &entry)?)
        }
        None => None,
    };

    let persisted = store.load()?;
    let outcome = reconcile::classify(&input.keys, persisted);
    debug!(path = %store.path().display(), state = %outcome.state, "store classified");

    match outcome.state {
        ReconciliationState::Absent => {
            store.create(&outcome.mapping)?;
            info!(
                path = %store.path().display(),
                keys = outcome.mapping.len(),
                "scaffolded new store"
            );
        }
        ReconciliationState::KeyMismatch => {
            if !outcome.discarded.is_empty() {
                warn!(
                    path = %store.path().display(),
                    keys = ?outcome.discarded,
                    "dropping undeclared keys that still held values"
                );
            }
            store.save(&outcome.mapping)?;
            info!(
                path = %store.path().display(),
                added = ?outcome.added,
                dropped = ?outcome.dropped,
                "store keys updated"
            );
        }
        ReconciliationState::Incomplete | ReconciliationState::Ready => {}
    }

    Ok(Reconciled {
        state: outcome.state,
        mapping: outcome.mapping,
        path: store.path().to_path_buf(),
        added: outcome.added,
        dropped: outcome.dropped,
        ignore,
    })
}

/// The ignore-file line for `store_path`: its path relative to the ignore
/// file's directory with `/` separators, or just the file name when the
/// store lives elsewhere.
fn ignore_entry(ignore_path: &Path, store_path: &Path) -> String {
    let base = ignore_path.parent().unwrap_or(Path::new(""));
    match store_path.strip_prefix(base) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        _ => store_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}
