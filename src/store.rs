//! Store adapter: load and save the key/value document on disk.
//!
//! Saves go through a temporary file in the target directory followed by a
//! rename, so readers never observe a half-written document. Parent
//! directories are created as needed.
//!
//! The store is a single-writer resource. Running several processes against
//! one store needs an external lock around load → reconcile → save.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::LocalVarsError;
use crate::format::{self, FormatError};
use crate::reconcile::Mapping;
use crate::types::StoreFormat;

/// A store document at a fixed path.
#[derive(Debug, Clone, PartialEq)]
pub struct Store {
    path: PathBuf,
    format: StoreFormat,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>, format: StoreFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> StoreFormat {
        self.format
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the mapping. `Ok(None)` means the document does not exist.
    pub fn load(&self) -> Result<Option<Mapping>, LocalVarsError> {
        let Some(bytes) = self.read()? else {
            return Ok(None);
        };
        let content = String::from_utf8(bytes).map_err(|e| LocalVarsError::ParseError {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        let mapping = format::parse_document(&content, self.format).map_err(|e| match e {
            FormatError::Syntax(reason) => LocalVarsError::ParseError {
                path: self.path.clone(),
                reason,
            },
            FormatError::NotFlat(key) => LocalVarsError::NotFlat {
                path: self.path.clone(),
                key,
            },
        })?;
        debug!(path = %self.path.display(), keys = mapping.len(), "store loaded");
        Ok(Some(mapping))
    }

    /// Write `mapping`, replacing the previous document.
    pub fn save(&self, mapping: &Mapping) -> Result<(), LocalVarsError> {
        // An undecodable previous document is replaced, not patched.
        let previous = self.read()?.and_then(|b| String::from_utf8(b).ok());
        let content = format::render_document(mapping, previous.as_deref(), self.format);
        self.write_atomic(&content)?;
        debug!(path = %self.path.display(), keys = mapping.len(), "store saved");
        Ok(())
    }

    /// Write a brand-new document.
    ///
    /// # Panics
    ///
    /// Panics if the document already exists; callers check first.
    pub fn create(&self, mapping: &Mapping) -> Result<(), LocalVarsError> {
        assert!(
            !self.exists(),
            "localvars: store {} already exists",
            self.path.display()
        );
        self.save(mapping)
    }

    fn read(&self) -> Result<Option<Vec<u8>>, LocalVarsError> {
        match std::fs::read(&self.path) {
            Ok(c) => Ok(Some(c)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LocalVarsError::IoError {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn write_atomic(&self, content: &str) -> Result<(), LocalVarsError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| LocalVarsError::IoError {
            path: dir.clone(),
            source: e,
        })?;

        let io_err = |source: std::io::Error| LocalVarsError::IoError {
            path: self.path.clone(),
            source,
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(io_err)?;
        tmp.write_all(content.as_bytes()).map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}
