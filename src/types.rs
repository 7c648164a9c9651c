//! Public option and action types.
//!
//! # Store location
//!
//! The store document and the ignore file live in one directory, chosen with
//! [`StoreDir`]:
//!
//! - **`Cwd`** (default) — the working directory at load time.
//! - **`Path(dir)`** — an explicit directory. Preferred for services and
//!   tests, since it does not depend on where the process was started.
//! - **`Platform`** — the OS config directory for the app name (XDG on Linux).
//! - **`Home(".myapp")`** — a dotfile directory under `$HOME`.
//! - **`ProjectRoot(boundary)`** — walks up from the working directory until
//!   the [`Boundary`] marker is found. `ProjectRoot(Boundary::Marker(".git"))`
//!   puts the store next to the repository's top-level `.gitignore`.

use std::path::{Path, PathBuf};

/// Directory holding the store document and its ignore file.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StoreDir {
    /// Current working directory.
    #[default]
    Cwd,
    /// An explicit directory.
    Path(PathBuf),
    /// Platform config directory (XDG on Linux, ~/Library/Application Support on macOS).
    Platform,
    /// A subdirectory under the user's home directory, e.g. `Home(".myapp")`.
    Home(&'static str),
    /// Nearest ancestor of the working directory that satisfies the boundary.
    ProjectRoot(Boundary),
}

/// Where a [`StoreDir::ProjectRoot`] walk stops.
#[derive(Debug, Clone, PartialEq)]
pub enum Boundary {
    /// Walk all the way to the filesystem root.
    Root,
    /// Stop at the first directory containing this file or directory name.
    Marker(&'static str),
}

/// Serialization of the store document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreFormat {
    /// A JSON object of string values.
    #[default]
    Json,
    /// Top-level TOML `key = "value"` pairs. Comments survive rewrites.
    Toml,
}

impl StoreFormat {
    /// Pick a format from a file name: `.toml` → `Toml`, anything else → `Json`.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => StoreFormat::Toml,
            _ => StoreFormat::Json,
        }
    }
}

/// An operator action on the store, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreAction {
    Status,
    List,
    Get { key: String },
    Set { key: String, value: String },
    Unset { key: String },
    Template,
}
