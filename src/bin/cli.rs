//! KeyLite CLI
//!
//! Command-line front end over a single-file KeyLite database. Each
//! invocation opens the database, runs one command, and closes it, so
//! state persists across runs.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use keylite::{Config, KeyValueStore, StoreError};

/// KeyLite CLI
#[derive(Parser, Debug)]
#[command(name = "keylite-cli")]
#[command(about = "CLI for the KeyLite embedded key-value store")]
struct Args {
    /// Database file path
    #[arg(short, long, default_value = "keylite.db")]
    database: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Clear a key
    Clear {
        /// The key to clear
        key: String,
    },

    /// Clear every key
    ClearAll,

    /// Check whether a key exists
    Exists {
        /// The key to check
        key: String,
    },

    /// Count the keys
    Count,

    /// List keys, optionally restricted to a literal prefix
    Keys {
        /// Literal key prefix; empty matches everything
        #[arg(default_value = "")]
        prefix: String,
    },

    /// List key-value pairs, optionally restricted to a literal prefix
    Entries {
        /// Literal key prefix; empty matches everything
        #[arg(default_value = "")]
        prefix: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), StoreError> {
    let config = Config::builder().file_path(&args.database).build()?;
    let mut store = KeyValueStore::initialize(config);
    store.open()?;

    match args.command {
        Commands::Get { key } => match store.get(&key)? {
            Some(value) => println!("{}", value),
            None => println!("(not found)"),
        },
        Commands::Set { key, value } => {
            store.set(key, value)?;
        }
        Commands::Clear { key } => {
            store.clear(&key)?;
        }
        Commands::ClearAll => {
            store.clear_all()?;
        }
        Commands::Exists { key } => {
            println!("{}", store.key_exists(&key)?);
        }
        Commands::Count => {
            println!("{}", store.key_count()?);
        }
        Commands::Keys { prefix } => {
            for key in store.fetch_keys_starting_with(&prefix)? {
                println!("{}", key);
            }
        }
        Commands::Entries { prefix } => {
            for entry in store.fetch_key_values_starting_with(&prefix)? {
                println!("{}\t{}", entry.key, entry.value);
            }
        }
    }

    store.close()
}
