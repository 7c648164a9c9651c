use std::path::{Path, PathBuf};

use crate::error::LocalVarsError;
use crate::location;
use crate::ops::{self, StoreResult};
use crate::reconcile::{DeclaredKeys, Mapping};
use crate::resolve::{self, Reconciled, ResolveInput};
use crate::store::Store;
use crate::types::{StoreAction, StoreDir, StoreFormat};

const DEFAULT_FILE_NAME: &str = ".env";
const DEFAULT_IGNORE_FILE: &str = ".gitignore";

/// Entry point for building a store reconciliation.
pub struct LocalVars;

impl LocalVars {
    pub fn builder() -> LocalVarsBuilder {
        LocalVarsBuilder::new()
    }
}

/// Builder for declaring keys and locating the store.
///
/// - **Keys**: [`keys()`](Self::keys) / [`key()`](Self::key) — what the program requires.
/// - **Location**: [`dir()`](Self::dir) and [`file_name()`](Self::file_name) — where the store lives.
/// - **Ignore list**: [`ignore_file()`](Self::ignore_file) / [`no_ignore()`](Self::no_ignore).
#[derive(Debug, Clone)]
pub struct LocalVarsBuilder {
    keys: Vec<String>,
    app_name: Option<String>,
    file_name: Option<String>,
    dir: StoreDir,
    format: Option<StoreFormat>,
    ignore_file: Option<String>,
    ignore_enabled: bool,
}

impl LocalVarsBuilder {
    fn new() -> Self {
        Self {
            keys: Vec::new(),
            app_name: None,
            file_name: None,
            dir: StoreDir::default(),
            format: None,
            ignore_file: None,
            ignore_enabled: true,
        }
    }

    /// Declare required keys. Appends to any keys declared earlier.
    pub fn keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Declare one required key.
    pub fn key(mut self, key: &str) -> Self {
        self.keys.push(key.to_string());
        self
    }

    /// Set the application name. Only needed for [`StoreDir::Platform`].
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Override the store file name (default: `".env"`).
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    /// Set the directory holding the store and ignore file (default: [`StoreDir::Cwd`]).
    pub fn dir(mut self, dir: StoreDir) -> Self {
        self.dir = dir;
        self
    }

    /// Force a document format. By default it follows the file extension.
    pub fn format(mut self, format: StoreFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Override the ignore file name (default: `".gitignore"`), resolved in
    /// the store directory.
    pub fn ignore_file(mut self, name: &str) -> Self {
        self.ignore_file = Some(name.to_string());
        self
    }

    /// Do not touch any ignore file.
    pub fn no_ignore(mut self) -> Self {
        self.ignore_enabled = false;
        self
    }

    fn effective_file_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or(DEFAULT_FILE_NAME)
    }

    fn effective_format(&self) -> StoreFormat {
        self.format
            .unwrap_or_else(|| StoreFormat::from_path(Path::new(self.effective_file_name())))
    }

    fn effective_ignore_file(&self) -> Option<&str> {
        if !self.ignore_enabled {
            return None;
        }
        Some(self.ignore_file.as_deref().unwrap_or(DEFAULT_IGNORE_FILE))
    }

    /// # Panics
    ///
    /// Panics if no keys were declared.
    fn declared_keys(&self) -> DeclaredKeys {
        DeclaredKeys::new(self.keys.iter().cloned())
    }

    /// Resolve paths and build the `ResolveInput`.
    fn build_input(&self) -> Result<ResolveInput, LocalVarsError> {
        let keys = self.declared_keys();
        let dir = location::resolve_store_dir(&self.dir, self.app_name.as_deref())?;
        let store = Store::new(dir.join(self.effective_file_name()), self.effective_format());
        let ignore_file = self.effective_ignore_file().map(|name| dir.join(name));

        Ok(ResolveInput {
            keys,
            store,
            ignore_file,
        })
    }

    /// Path the store document resolves to.
    pub fn store_path(&self) -> Result<PathBuf, LocalVarsError> {
        let dir = location::resolve_store_dir(&self.dir, self.app_name.as_deref())?;
        Ok(dir.join(self.effective_file_name()))
    }

    /// Reconcile the store with the declared keys.
    ///
    /// Scaffolds or rewrites the store when needed and reports the state.
    /// Only I/O and format problems are errors; use
    /// [`Reconciled::into_ready`] or [`load_ready`](Self::load_ready) to treat
    /// setup-required states as errors too.
    ///
    /// # Panics
    ///
    /// Panics if no keys were declared.
    pub fn load(self) -> Result<Reconciled, LocalVarsError> {
        let input = self.build_input()?;
        resolve::resolve(&input)
    }

    /// Reconcile and return the values, or [`LocalVarsError::SetupRequired`].
    pub fn load_ready(self) -> Result<Mapping, LocalVarsError> {
        self.load()?.into_ready()
    }

    /// Handle a `StoreAction` and print the result to stdout.
    pub fn handle_and_print(self, action: &StoreAction) -> Result<(), LocalVarsError> {
        let result = self.handle(action)?;
        println!("{result}");
        Ok(())
    }

    /// Handle a `StoreAction` (status / list / get / set / unset / template).
    ///
    /// Every action except `Template` reconciles first, so operating on a
    /// missing or stale store scaffolds or updates it before the action runs.
    pub fn handle(self, action: &StoreAction) -> Result<StoreResult, LocalVarsError> {
        if let StoreAction::Template = action {
            return Ok(StoreResult::Template(ops::generate_template(
                &self.declared_keys(),
                self.effective_format(),
            )));
        }

        let input = self.build_input()?;
        let reconciled = resolve::resolve(&input)?;

        match action {
            StoreAction::Status => Ok(ops::status(&reconciled)),
            StoreAction::List => Ok(ops::list_values(&reconciled.mapping)),
            StoreAction::Get { key } => ops::get_value(&reconciled.mapping, &input.keys, key),
            StoreAction::Set { key, value } => {
                ops::set_value(&input.store, reconciled.mapping, &input.keys, key, value)
            }
            StoreAction::Unset { key } => {
                ops::unset_value(&input.store, reconciled.mapping, &input.keys, key)
            }
            StoreAction::Template => unreachable!("template handled above"),
        }
    }
}
