//! Clap adapter for localvars.
//!
//! Compiled only with the `clap` Cargo feature (on by default). It provides
//! [`StoreArgs`] and [`StoreSubcommand`], which embed into an app's clap
//! derive to give operators `status|list|get|set|unset|template` subcommands.
//!
//! The only bridge to the core is [`StoreArgs::into_action()`]. From there,
//! everything goes through the clap-free
//! [`LocalVarsBuilder::handle()`](crate::LocalVarsBuilder::handle) API.

use clap::{Args, Subcommand};

use crate::types::StoreAction;

/// Clap-derived args for a store subcommand group.
///
/// Embed this into your app's clap derive:
/// ```ignore
/// #[derive(Subcommand)]
/// enum Commands {
///     Vars(StoreArgs),
/// }
/// ```
#[derive(Debug, Args)]
pub struct StoreArgs {
    #[command(subcommand)]
    pub action: Option<StoreSubcommand>,
}

/// Available store subcommands.
#[derive(Debug, Subcommand)]
pub enum StoreSubcommand {
    /// Reconcile the store and report whether every value is set.
    Status,
    /// Show every declared key and its value.
    List,
    /// Show the value of one declared key.
    Get {
        /// Declared key name.
        key: String,
    },
    /// Write a value for a declared key.
    Set {
        /// Declared key name.
        key: String,
        /// Value to store.
        value: String,
    },
    /// Clear the value of a declared key, keeping the key.
    Unset {
        /// Declared key name.
        key: String,
    },
    /// Print a blank store document for the declared keys.
    Template,
}

impl StoreArgs {
    /// Convert clap-parsed args into a framework-agnostic `StoreAction`.
    ///
    /// A bare invocation (no subcommand) maps to `StoreAction::Status`.
    pub fn into_action(self) -> StoreAction {
        match self.action {
            None | Some(StoreSubcommand::Status) => StoreAction::Status,
            Some(StoreSubcommand::List) => StoreAction::List,
            Some(StoreSubcommand::Get { key }) => StoreAction::Get { key },
            Some(StoreSubcommand::Set { key, value }) => StoreAction::Set { key, value },
            Some(StoreSubcommand::Unset { key }) => StoreAction::Unset { key },
            Some(StoreSubcommand::Template) => StoreAction::Template,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    /// Wrapper so we can use `try_parse_from` on the subcommand.
    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        store: StoreArgs,
    }

    fn parse(args: &[&str]) -> StoreAction {
        TestCli::try_parse_from(args).unwrap().store.into_action()
    }

    #[test]
    fn bare_is_status() {
        assert_eq!(parse(&["test"]), StoreAction::Status);
    }

    #[test]
    fn explicit_status() {
        assert_eq!(parse(&["test", "status"]), StoreAction::Status);
    }

    #[test]
    fn parse_list() {
        assert_eq!(parse(&["test", "list"]), StoreAction::List);
    }

    #[test]
    fn parse_get() {
        assert_eq!(
            parse(&["test", "get", "sql_username"]),
            StoreAction::Get {
                key: "sql_username".into()
            }
        );
    }

    #[test]
    fn parse_set() {
        assert_eq!(
            parse(&["test", "set", "sql_password", "s3cr3t"]),
            StoreAction::Set {
                key: "sql_password".into(),
                value: "s3cr3t".into(),
            }
        );
    }

    #[test]
    fn parse_set_value_with_spaces() {
        assert_eq!(
            parse(&["test", "set", "greeting", "hello world"]),
            StoreAction::Set {
                key: "greeting".into(),
                value: "hello world".into(),
            }
        );
    }

    #[test]
    fn parse_unset() {
        assert_eq!(
            parse(&["test", "unset", "token"]),
            StoreAction::Unset {
                key: "token".into()
            }
        );
    }

    #[test]
    fn parse_template() {
        assert_eq!(parse(&["test", "template"]), StoreAction::Template);
    }

    #[test]
    fn set_requires_value() {
        assert!(TestCli::try_parse_from(["test", "set", "key"]).is_err());
    }

    #[test]
    fn invalid_subcommand_errors() {
        assert!(TestCli::try_parse_from(["test", "nope"]).is_err());
    }
}
