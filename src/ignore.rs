//! Ignore-list management: make sure the store's file name is listed in a
//! line-oriented ignore file such as `.gitignore`.
//!
//! [`ensure_entry`] is the pure patch; [`ensure_listed`] wraps it with I/O.

use std::path::Path;

use tracing::{debug, info};

use crate::error::LocalVarsError;

/// What [`ensure_listed`] did to the ignore file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreUpdate {
    /// The file did not exist and was created with just the entry.
    Created,
    /// The entry was appended to an existing file.
    Appended,
    /// The entry was already listed; nothing was written.
    AlreadyPresent,
}

/// Whether some line of `content` equals `entry` exactly (a trailing `\r` is
/// ignored so CRLF files match).
pub fn is_listed(content: &str, entry: &str) -> bool {
    content
        .lines()
        .any(|line| line.strip_suffix('\r').unwrap_or(line) == entry)
}

/// Compute the new ignore file content, or `None` if no write is needed.
///
/// A missing file (`None`) becomes exactly `entry`. An existing file gets the
/// entry appended on its own line.
pub fn ensure_entry(content: Option<&str>, entry: &str) -> Option<String> {
    match content {
        None => Some(entry.to_string()),
        Some(c) if is_listed(c, entry) => None,
        Some(c) => {
            let mut out = c.to_string();
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(entry);
            Some(out)
        }
    }
}

/// I/O wrapper: read the ignore file (if it exists), add `entry` if missing,
/// write back. Calling it repeatedly never duplicates the entry.
pub fn ensure_listed(path: &Path, entry: &str) -> Result<IgnoreUpdate, LocalVarsError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => Some(c),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            return Err(LocalVarsError::IoError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let Some(new_content) = ensure_entry(content.as_deref(), entry) else {
        debug!(path = %path.display(), entry, "ignore entry already present");
        return Ok(IgnoreUpdate::AlreadyPresent);
    };

    std::fs::write(path, &new_content).map_err(|e| LocalVarsError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let update = if content.is_some() {
        IgnoreUpdate::Appended
    } else {
        IgnoreUpdate::Created
    };
    info!(path = %path.display(), entry, ?update, "ignore file updated");
    Ok(update)
}
