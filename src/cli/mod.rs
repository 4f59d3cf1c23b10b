//! Command-line interface.
//!
//! A thin layer over [`crate::core::store::Store`]: it resolves the store
//! root and identity file from flags or the environment, runs one
//! operation, and prints the result.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::execute;

/// pf - A versioned, age-encrypted password store.
#[derive(Parser)]
#[command(
    name = "pf",
    about = "A versioned, age-encrypted password store",
    version
)]
pub struct Cli {
    /// Store directory
    #[arg(short, long, global = true, env = "PF_STORE")]
    pub store: Option<PathBuf>,

    /// age identity file used for decryption [default: ~/.pf/age-key.txt]
    #[arg(short, long, global = true, env = "PF_IDENTITY")]
    pub identity: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create a store and seed its recipients
    Init {
        /// Recipient public key (repeatable). Without one, the identity
        /// file's key is used, generating it if needed.
        #[arg(short, long = "recipient")]
        recipients: Vec<String>,
    },

    /// Generate a new age key pair
    Keygen {
        /// Write the private key to this file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Store a new version of a password
    Put {
        /// Entry key (e.g., email/work)
        key: String,
        /// Password value; read from stdin when omitted
        value: Option<String>,
        /// Version message
        #[arg(short, long, default_value = "")]
        message: String,
        /// Read all of stdin instead of the first line
        #[arg(long)]
        multiline: bool,
    },

    /// Print a password
    Get {
        /// Entry key
        key: String,
        /// Version to read (0 = latest)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        version: i64,
    },

    /// Delete an entry and all of its versions
    Rm {
        /// Entry key
        key: String,
    },

    /// List all entry keys
    List {
        /// Show keys as a tree
        #[arg(long)]
        tree: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the version history of an entry
    History {
        /// Entry key
        key: String,
        /// Show at most this many versions (0 = all)
        #[arg(short, long, default_value_t = 0)]
        limit: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Restore an old version as the newest one
    Rollback {
        /// Entry key
        key: String,
        /// Version to restore
        version: i64,
        /// Version message [default: "Rollback to version N"]
        #[arg(short, long)]
        message: Option<String>,
    },
}
