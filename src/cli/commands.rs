//! Command implementations.
//!
//! Handler functions for each CLI command.

use std::collections::BTreeMap;
use std::io::{self, BufRead, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::debug;
use zeroize::Zeroizing;

use crate::cli::{output, Cli, Command};
use crate::core::cipher::{self, KeyPair};
use crate::core::config::{self, AuditConfig, StoreConfig};
use crate::core::store::{Store, Version, SEPARATOR};
use crate::error::{ConfigError, Error, Result};

/// Execute a parsed command line.
///
/// # Errors
///
/// Returns error if the command execution fails.
pub fn execute(cli: Cli) -> Result<()> {
    let identity = cli.identity.or_else(config::default_identity_file);

    match cli.command {
        Command::Init { recipients } => cmd_init(cli.store, identity, recipients),
        Command::Keygen { output } => cmd_keygen(output.as_deref()),
        Command::Put {
            key,
            value,
            message,
            multiline,
        } => {
            let store = open(cli.store, identity)?;
            cmd_put(&store, &key, value, &message, multiline)
        }
        Command::Get { key, version } => cmd_get(&open(cli.store, identity)?, &key, version),
        Command::Rm { key } => cmd_rm(&open(cli.store, identity)?, &key),
        Command::List { tree, json } => cmd_list(&open(cli.store, identity)?, tree, json),
        Command::History { key, limit, json } => {
            cmd_history(&open(cli.store, identity)?, &key, limit, json)
        }
        Command::Rollback {
            key,
            version,
            message,
        } => cmd_rollback(&open(cli.store, identity)?, &key, version, message.as_deref()),
    }
}

fn store_root(store: Option<PathBuf>) -> Result<PathBuf> {
    store.ok_or_else(|| ConfigError::MissingStore.into())
}

fn open(store: Option<PathBuf>, identity: Option<PathBuf>) -> Result<Store> {
    let root = store_root(store)?;
    if !config::is_store(&root) {
        return Err(ConfigError::NotAStore(root).into());
    }

    let mut config = StoreConfig::new(root).with_audit(AuditConfig::from_env());
    if let Some(path) = identity {
        config = config.with_identity_file(path);
    }
    Store::open(&config)
}

/// Create a store. Without explicit recipients, use (or create) the identity file.
fn cmd_init(
    store: Option<PathBuf>,
    identity: Option<PathBuf>,
    recipients: Vec<String>,
) -> Result<()> {
    let root = store_root(store)?;

    let recipients = if recipients.is_empty() {
        let path = identity.ok_or_else(|| {
            Error::InvalidInput("no recipient given and no identity file path".to_string())
        })?;
        own_recipients(&path)?
    } else {
        recipients
    };

    Store::init(&root, &recipients)?;

    output::success(&format!("initialized store at {}", output::key(&root.display().to_string())));
    for recipient in &recipients {
        output::kv("recipient:", recipient);
    }
    Ok(())
}

/// Public keys of the identity file, generating a new identity if it does not exist.
fn own_recipients(path: &Path) -> Result<Vec<String>> {
    if path.exists() {
        debug!(path = %path.display(), "using existing identity file");
        let identities = cipher::load_identities(path)?;
        return Ok(identities
            .iter()
            .map(|identity| identity.to_public().to_string())
            .collect());
    }

    let pair = KeyPair::generate();
    pair.write_identity_file(path)?;
    output::success(&format!(
        "generated identity at {}",
        output::key(&path.display().to_string())
    ));
    output::warn("back up this file: without it the store cannot be decrypted");
    Ok(vec![pair.recipient.clone()])
}

fn cmd_keygen(path: Option<&Path>) -> Result<()> {
    let pair = KeyPair::generate();

    match path {
        Some(path) => {
            if path.exists() {
                return Err(Error::InvalidInput(format!(
                    "{} already exists",
                    path.display()
                )));
            }
            pair.write_identity_file(path)?;
            output::success(&format!(
                "private key saved to {}",
                output::key(&path.display().to_string())
            ));
            output::kv("public key:", &pair.recipient);
        }
        None => {
            output::kv("public key: ", &pair.recipient);
            output::kv("private key:", pair.identity.as_str());
            output::warn("private key not saved; store it securely");
        }
    }
    Ok(())
}

fn cmd_put(
    store: &Store,
    key: &str,
    value: Option<String>,
    message: &str,
    multiline: bool,
) -> Result<()> {
    let value = match value {
        Some(value) => Zeroizing::new(value),
        None => read_stdin(multiline)?,
    };
    if value.is_empty() {
        return Err(Error::InvalidInput("password cannot be empty".to_string()));
    }

    let version = store.put(key, &value, message)?;
    output::success(&format!("stored {} (version {})", output::key(key), version));
    Ok(())
}

fn read_stdin(multiline: bool) -> Result<Zeroizing<String>> {
    let mut value = Zeroizing::new(String::new());
    if multiline {
        io::stdin().lock().read_to_string(&mut value)?;
    } else {
        io::stdin().lock().read_line(&mut value)?;
    }

    let trimmed_len = value.trim_end_matches(['\r', '\n']).len();
    value.truncate(trimmed_len);
    Ok(value)
}

fn cmd_get(store: &Store, key: &str, version: i64) -> Result<()> {
    let value = store.get(key, version)?;
    if value.ends_with('\n') {
        print!("{}", value.as_str());
    } else {
        println!("{}", value.as_str());
    }
    Ok(())
}

fn cmd_rm(store: &Store, key: &str) -> Result<()> {
    store.delete(key)?;
    output::success(&format!("removed {}", output::key(key)));
    Ok(())
}

fn cmd_list(store: &Store, tree: bool, json: bool) -> Result<()> {
    let keys = store.list()?;

    if json {
        let output = serde_json::json!({
            "keys": keys,
            "count": keys.len()
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if keys.is_empty() {
        output::dimmed("no passwords stored");
    } else if tree {
        print_tree(&keys);
    } else {
        for key in &keys {
            println!("{}", key);
        }
    }

    Ok(())
}

#[derive(Default)]
struct TreeNode {
    children: BTreeMap<String, TreeNode>,
}

fn print_tree(keys: &[String]) {
    let mut root = TreeNode::default();
    for key in keys {
        let mut node = &mut root;
        for segment in key.split(SEPARATOR) {
            node = node.children.entry(segment.to_string()).or_default();
        }
    }
    print_children(&root, "");
}

fn print_children(node: &TreeNode, prefix: &str) {
    let count = node.children.len();
    for (i, (name, child)) in node.children.iter().enumerate() {
        let last = i + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        println!("{}{}{}", prefix, branch, name);

        let next = format!("{}{}", prefix, if last { "    " } else { "│   " });
        print_children(child, &next);
    }
}

fn cmd_history(store: &Store, key: &str, limit: i64, json: bool) -> Result<()> {
    let history = store.history(key, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }

    if history.is_empty() {
        output::dimmed(&format!("no history for {}", key));
        return Ok(());
    }

    output::header(&format!("History for {}", output::key(key)));
    for (i, version) in history.iter().enumerate() {
        print_version(version, i == 0);
    }
    Ok(())
}

fn print_version(version: &Version, current: bool) {
    let when = DateTime::from_timestamp(version.timestamp, 0)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| version.timestamp.to_string());

    println!();
    println!(
        "version {}{} - {}",
        version.version,
        if current { " (current)" } else { "" },
        when
    );
    if !version.message.is_empty() {
        output::kv("message:", &version.message);
    }
    if !version.author.is_empty() {
        output::kv("author: ", &version.author);
    }
}

fn cmd_rollback(store: &Store, key: &str, version: i64, message: Option<&str>) -> Result<()> {
    let new_version = store.rollback(key, version, message)?;
    output::success(&format!(
        "rolled back {} to version {} (now version {})",
        output::key(key),
        version,
        new_version
    ));
    Ok(())
}
