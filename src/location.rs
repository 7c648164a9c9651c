//! Resolve a [`StoreDir`] to a concrete directory.
//!
//! `ProjectRoot` walks upward from a start directory (the working directory
//! unless a test supplies one) and stops, inclusive, at the first directory
//! that contains the boundary marker. If no marker is found the walk falls
//! back to the start directory, so the store never lands in an unrelated
//! parent.

use std::path::{Path, PathBuf};

use crate::error::LocalVarsError;
use crate::types::{Boundary, StoreDir};

/// Resolve `dir` to a directory path.
///
/// `app_name` is only consulted for [`StoreDir::Platform`].
pub fn resolve_store_dir(dir: &StoreDir, app_name: Option<&str>) -> Result<PathBuf, LocalVarsError> {
    let cwd = || {
        std::env::current_dir().map_err(|e| LocalVarsError::IoError {
            path: PathBuf::from("."),
            source: e,
        })
    };

    match dir {
        StoreDir::Cwd => cwd(),
        StoreDir::Path(p) => Ok(p.clone()),
        StoreDir::Platform => {
            let app = app_name.ok_or(LocalVarsError::AppNameRequired)?;
            let proj = directories::ProjectDirs::from("", "", app).ok_or(LocalVarsError::NoHomeDir)?;
            Ok(proj.config_dir().to_path_buf())
        }
        StoreDir::Home(subdir) => {
            let base = directories::BaseDirs::new().ok_or(LocalVarsError::NoHomeDir)?;
            Ok(base.home_dir().join(subdir))
        }
        StoreDir::ProjectRoot(boundary) => Ok(find_project_root(&cwd()?, boundary)),
    }
}

/// Walk from `start` toward the filesystem root looking for the boundary.
///
/// - [`Root`](Boundary::Root) returns the filesystem root.
/// - [`Marker(name)`](Boundary::Marker) returns the first directory containing
///   `name`, or `start` if none does.
pub fn find_project_root(start: &Path, boundary: &Boundary) -> PathBuf {
    let mut current = start;
    loop {
        if let Boundary::Marker(name) = boundary
            && current.join(name).exists()
        {
            return current.to_path_buf();
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => break, // reached root
        }
    }

    match boundary {
        Boundary::Root => current.to_path_buf(),
        Boundary::Marker(_) => start.to_path_buf(),
    }
}
