//! # localvars demo application
//!
//! A small CLI that needs a database login and shows how an app wires
//! [localvars](https://docs.rs/localvars) into its startup. It exists to
//! exercise the library by hand.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example localvars_demo -- run
//! cargo run --example localvars_demo -- vars set sql_username admin
//! cargo run --example localvars_demo -- vars list
//! ```
//!
//! | Feature                 | How to exercise it                                                 |
//! |-------------------------|--------------------------------------------------------------------|
//! | Scaffold on first run   | `run` in an empty directory                                        |
//! | Refuse while incomplete | `run` again before filling values                                  |
//! | Fill values             | `vars set sql_username admin`, `vars set sql_password s3cr3t`      |
//! | Key drift               | `run --with-token` adds `api_token` to the declared keys           |
//! | TOML store              | `--store vars.toml run`                                            |
//! | Explicit directory      | `--dir /tmp/demo run`                                              |
//! | Logging                 | `RUST_LOG=debug cargo run --example localvars_demo -- run`         |

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use localvars::{LocalVars, LocalVarsBuilder, LocalVarsError, StoreArgs, StoreDir};

/// localvars demo — a sample app that needs credentials before it starts.
#[derive(Parser, Debug)]
#[command(name = "localvars-demo")]
struct Cli {
    /// Directory holding the store and .gitignore (default: working directory).
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Store file name.
    #[arg(long, global = true, default_value = ".env")]
    store: String,

    /// Also require an `api_token` key.
    #[arg(long, global = true)]
    with_token: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the "application" once every value is set.
    Run,
    /// Inspect and edit the store (status, list, get, set, unset, template).
    Vars(StoreArgs),
}

fn make_builder(cli: &Cli) -> LocalVarsBuilder {
    let mut keys = vec!["sql_username", "sql_password"];
    if cli.with_token {
        keys.push("api_token");
    }

    let dir = match &cli.dir {
        Some(d) => StoreDir::Path(d.clone()),
        None => StoreDir::Cwd,
    };

    LocalVars::builder()
        .keys(keys)
        .file_name(&cli.store)
        .dir(dir)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let builder = make_builder(&cli);

    match cli.command {
        Commands::Run => match builder.load_ready() {
            Ok(vars) => {
                info!(user = %vars["sql_username"], "connecting to database");
                println!("Started with {} variables.", vars.len());
            }
            Err(LocalVarsError::SetupRequired(setup)) => {
                eprintln!("{setup}");
                if !setup.missing.is_empty() {
                    eprintln!("Missing values: {}", setup.missing.join(", "));
                }
                std::process::exit(2);
            }
            Err(e) => {
                eprintln!("Failed to load variables:\n{e}");
                std::process::exit(1);
            }
        },
        Commands::Vars(args) => {
            let action = args.into_action();
            builder.handle_and_print(&action).unwrap_or_else(|e| {
                eprintln!("Store error:\n{e}");
                std::process::exit(1);
            });
        }
    }
}
