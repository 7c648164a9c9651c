//! File-backed local variables with self-describing setup. Declare the keys
//! your program needs, and localvars keeps a flat key/value store on disk in
//! step with them.
//!
//! ```ignore
//! let vars = LocalVars::builder()
//!     .keys(["sql_username", "sql_password"])
//!     .load_ready()?;
//! ```
//!
//! On the first run that call creates `.env` in the working directory with
//! both keys blank, lists `.env` in `.gitignore`, and returns
//! [`LocalVarsError::SetupRequired`]. Once an operator fills in the values,
//! the same call returns the mapping.
//!
//! # States
//!
//! Every load classifies the store into exactly one
//! [`ReconciliationState`], checked in this order:
//!
//! | State | Meaning | Store rewritten? |
//! |-------|---------|------------------|
//! | `Absent` | No store yet. A blank one is scaffolded. | yes |
//! | `KeyMismatch` | The store's keys differ from the declared keys. | yes |
//! | `Incomplete` | Keys match, some value is `""`. | no |
//! | `Ready` | Keys match, every value is set. | no |
//!
//! On a key mismatch the store is rebuilt around the declared keys: values of
//! keys present in both are kept, new keys are blank, and undeclared keys are
//! removed. Removing a key discards its value. A `warn` event is logged when
//! that happens to a populated value.
//!
//! Only the exact empty string counts as unset. A value of `" "` is set.
//!
//! # Results, not exceptions
//!
//! [`LocalVarsBuilder::load`] returns a [`Reconciled`] for every state, so
//! callers can match on [`Reconciled::state`]. Errors are reserved for I/O
//! and malformed documents. [`LocalVarsBuilder::load_ready`] (or
//! [`Reconciled::into_ready`]) folds the three setup-required states into
//! [`LocalVarsError::SetupRequired`] for the common "refuse to start" path.
//!
//! Declaring zero keys is a programming error and panics.
//!
//! # The engine on its own
//!
//! The [`reconcile`] module holds the classification and merge logic as
//! plain functions over in-memory data: [`reconcile::classify`],
//! [`reconcile::merge`], [`reconcile::keys_equal`], and
//! [`reconcile::has_all_values`]. Use them directly to reconcile a mapping
//! that lives somewhere other than a file.
//!
//! # Store location and format
//!
//! The store and its ignore file share a directory chosen with [`StoreDir`].
//! The default is the working directory; pass
//! [`StoreDir::Path`] to make it explicit. The document is a JSON object of
//! strings unless the file name ends in `.toml` (or
//! [`format()`](LocalVarsBuilder::format) says otherwise). TOML stores keep
//! their comments across rewrites.
//!
//! Saves are atomic (temp file + rename). The store is a single-writer
//! resource: processes sharing one store must serialize access themselves.
//!
//! # Clap adapter
//!
//! The `cli` module (behind the `clap` feature) offers [`StoreArgs`], a
//! clap derive struct that gives operators
//! `status|list|get|set|unset|template` subcommands.
//! [`into_action()`](StoreArgs::into_action) bridges to
//! [`LocalVarsBuilder::handle`].

pub mod error;
pub mod reconcile;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod format;
mod ignore;
mod location;
mod ops;
mod resolve;
mod store;

#[cfg(test)]
mod fixtures;

pub use builder::{LocalVars, LocalVarsBuilder};
#[cfg(feature = "clap")]
pub use cli::{StoreArgs, StoreSubcommand};
pub use error::{LocalVarsError, SetupRequired};
pub use ignore::{IgnoreUpdate, ensure_listed};
pub use ops::StoreResult;
pub use reconcile::{DeclaredKeys, Mapping, Reconciliation, ReconciliationState};
pub use resolve::Reconciled;
pub use store::Store;
pub use types::{Boundary, StoreAction, StoreDir, StoreFormat};
