use std::path::PathBuf;
use thiserror::Error;

use crate::reconcile::ReconciliationState;

#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum LocalVarsError {
    #[error("Failed to read or write {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {reason}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(help("fix the document by hand or delete it to scaffold a fresh one"))
    )]
    ParseError { path: PathBuf, reason: String },

    #[error("Value for '{key}' in {path} is not a string")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(help("the store only holds flat string values; quote the value"))
    )]
    NotFlat { path: PathBuf, key: String },

    #[error("Key not declared: {0}")]
    UnknownKey(String),

    #[error("App name is required for the platform store directory — call .app_name() on the builder")]
    AppNameRequired,

    #[error("Could not resolve a home directory for the store")]
    NoHomeDir,

    #[error(transparent)]
    #[cfg_attr(feature = "rich-errors", diagnostic(transparent))]
    SetupRequired(#[from] SetupRequired),
}

/// The store exists (or was just scaffolded) but cannot be used yet.
///
/// Carries the reconciliation state so callers can match on the case instead
/// of parsing the message.
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
#[error("{} ({})", .state.message(), .path.display())]
#[cfg_attr(
    feature = "rich-errors",
    diagnostic(help("edit the store and fill in every value, then run again"))
)]
pub struct SetupRequired {
    pub state: ReconciliationState,
    pub path: PathBuf,
    /// Declared keys that have no value yet.
    pub missing: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_formats_correctly() {
        let err = LocalVarsError::ParseError {
            path: "/work/app/.env".into(),
            reason: "EOF while parsing an object at line 1 column 33".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains(".env"));
        assert!(msg.contains("line 1"));
    }

    #[test]
    fn unknown_key_formats() {
        let err = LocalVarsError::UnknownKey("sql_password".into());
        assert!(err.to_string().contains("sql_password"));
    }

    #[test]
    fn app_name_required_formats() {
        let err = LocalVarsError::AppNameRequired;
        assert!(err.to_string().contains("app_name"));
    }

    #[test]
    fn setup_required_names_the_case_and_path() {
        let err: LocalVarsError = SetupRequired {
            state: ReconciliationState::KeyMismatch,
            path: "/work/app/.env".into(),
            missing: vec!["token".into()],
        }
        .into();
        let msg = err.to_string();
        assert!(msg.contains("keys differ"));
        assert!(msg.contains("/work/app/.env"));
    }
}
