//! Versioned entry store.
//!
//! Each key is one TOML file under the store root holding every version
//! ever written for it. `put` appends, `delete` removes the whole file,
//! and nothing else ever rewrites history.
//!
//! ## Concurrency
//!
//! The store holds no locks. Every call re-reads the file from disk, and
//! `put` is a read-modify-write of the whole entry: two writers racing on
//! the same key can lose a version (last write wins). Callers that need
//! more than that must serialize access themselves.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use ::age::x25519;
use chrono::Utc;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::core::audit::{AuditLog, Event};
use crate::core::cipher;
use crate::core::config::{AuditConfig, StoreConfig};
use crate::core::constants::{self, HIDDEN_PREFIX};
use crate::error::{CipherError, ConfigError, Result, StoreError};

mod entry;
mod key;

pub use entry::{Entry, Version};
pub use key::{Key, SEPARATOR};

/// A store rooted at one directory.
pub struct Store {
    root: PathBuf,
    recipients: Vec<String>,
    identities: Vec<x25519::Identity>,
    audit: AuditLog,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("root", &self.root)
            .field("recipients", &self.recipients)
            .field("identities", &self.identities.len())
            .field("audit", &self.audit)
            .finish()
    }
}

impl Store {
    // --- Construction ---

    /// Store with explicit key material.
    pub fn new(
        root: impl Into<PathBuf>,
        recipients: Vec<String>,
        identities: Vec<x25519::Identity>,
        audit: AuditConfig,
    ) -> Self {
        let root = root.into();
        let audit = AuditLog::for_store(&root, audit);
        Self {
            root,
            recipients,
            identities,
            audit,
        }
    }

    /// Open an existing store from resolved configuration.
    ///
    /// Recipients come from the store's `.recipients` file. A missing or
    /// unusable identity file is not an error: the store is then write-only.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotAStore` if the root is not a directory.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        if !config.root.is_dir() {
            return Err(ConfigError::NotAStore(config.root.clone()).into());
        }

        let recipients = cipher::load_recipients(&config.recipients_path())?;

        let identities = match &config.identity_file {
            Some(path) => cipher::load_identities(path).unwrap_or_else(|e| {
                debug!(error = %e, "no usable identities, store is write-only");
                Vec::new()
            }),
            None => Vec::new(),
        };

        debug!(
            root = %config.root.display(),
            recipients = recipients.len(),
            identities = identities.len(),
            "store opened"
        );

        Ok(Self::new(
            config.root.clone(),
            recipients,
            identities,
            config.audit.clone(),
        ))
    }

    /// Create a store directory and seed its recipients file.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::NoRecipients` / `CipherError::InvalidRecipient`
    /// for bad recipients and `ConfigError::AlreadyInitialized` if the
    /// recipients file already exists.
    pub fn init<S: AsRef<str>>(root: &Path, recipients: &[S]) -> Result<()> {
        if recipients.is_empty() {
            return Err(CipherError::NoRecipients.into());
        }
        for recipient in recipients {
            cipher::parse_recipient(recipient.as_ref())?;
        }

        let recipients_path = root.join(constants::RECIPIENTS_FILE);
        if recipients_path.exists() {
            return Err(ConfigError::AlreadyInitialized(root.to_path_buf()).into());
        }

        create_private_dir(root)?;

        let mut contents = String::from("# age recipients for this store, one per line\n");
        for recipient in recipients {
            contents.push_str(recipient.as_ref().trim());
            contents.push('\n');
        }
        write_private_file(&recipients_path, contents.as_bytes())?;

        debug!(root = %root.display(), recipients = recipients.len(), "store initialized");
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Public keys new versions are encrypted to.
    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    /// Whether any identity is available for decryption.
    pub fn can_decrypt(&self) -> bool {
        !self.identities.is_empty()
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    // --- Operations ---

    /// Decrypt a version of `key`.
    ///
    /// `version` is 1-based; zero, negative or out-of-range values select
    /// the latest version.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the key does not exist and
    /// `CipherError::DecryptionFailed` if no identity can open the value.
    pub fn get(&self, key: &str, version: i64) -> Result<Zeroizing<String>> {
        let key = Key::parse(key)?;
        self.audit.log(Event::Access, key.as_str(), None);

        let entry = self.load_entry(&key)?;
        let selected = entry
            .select(version)
            .ok_or_else(|| StoreError::Empty(key.to_string()))?;

        debug!(key = %key, requested = version, version = selected.version, "decrypting");
        cipher::decrypt(&selected.password, &self.identities)
    }

    /// Encrypt `plaintext` and append it as the newest version of `key`.
    ///
    /// Creates the entry on first write. Returns the new version number.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::NoRecipients` if the store has no recipients.
    pub fn put(&self, key: &str, plaintext: &str, message: &str) -> Result<u32> {
        let key = Key::parse(key)?;
        self.audit.log(Event::Modify, key.as_str(), Some(message));

        let encrypted = cipher::encrypt(plaintext, &self.recipients)?;

        let mut entry = match self.load_entry(&key) {
            Ok(entry) => entry,
            Err(e) if e.is_not_found() => {
                debug!(key = %key, "creating entry");
                Entry::new(key.as_str())
            }
            Err(e) => return Err(e),
        };

        let version = entry.push(
            encrypted,
            Utc::now().timestamp(),
            self.audit.actor(),
            message,
        );
        self.save_entry(&key, &entry)?;

        debug!(key = %key, version, "version written");
        Ok(version)
    }

    /// Remove `key` and all of its versions.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the key does not exist.
    pub fn delete(&self, key: &str) -> Result<()> {
        let key = Key::parse(key)?;
        self.audit.log(Event::Delete, key.as_str(), None);

        let path = key.to_path(&self.root);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(key = %key, "entry deleted");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(key.to_string()).into())
            }
            Err(source) => Err(StoreError::WriteFailed { path, source }.into()),
        }
    }

    /// Version metadata for `key`, newest first, without ciphertext.
    ///
    /// A positive `limit` truncates; zero or negative returns everything.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the key does not exist.
    pub fn history(&self, key: &str, limit: i64) -> Result<Vec<Version>> {
        let key = Key::parse(key)?;
        let entry = self.load_entry(&key)?;
        Ok(entry.history(limit))
    }

    /// Every key in the store, sorted.
    ///
    /// Hidden files and directories are skipped. Not audited. A root that
    /// does not exist yet is an empty store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ReadFailed` if a directory cannot be read.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            trace!(root = %self.root.display(), "store root missing, nothing to list");
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        self.collect_keys(&self.root, &mut keys)?;
        keys.sort();

        trace!(count = keys.len(), "listed entries");
        Ok(keys.into_iter().map(|k| k.to_string()).collect())
    }

    /// Re-store an old version of `key` as its newest version.
    ///
    /// `version` is selected like in [`Store::get`]. The default message is
    /// `Rollback to version N`. Returns the new version number.
    pub fn rollback(&self, key: &str, version: i64, message: Option<&str>) -> Result<u32> {
        let plaintext = self.get(key, version)?;
        let message = match message {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => format!("Rollback to version {}", version),
        };
        self.put(key, &plaintext, &message)
    }

    // --- Files ---

    fn load_entry(&self, key: &Key) -> Result<Entry> {
        let path = key.to_path(&self.root);
        trace!(path = %path.display(), "reading entry");

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(key.to_string()).into())
            }
            Err(source) => return Err(StoreError::ReadFailed { path, source }.into()),
        };

        toml::from_str(&contents).map_err(|source| StoreError::Parse { path, source }.into())
    }

    fn save_entry(&self, key: &Key, entry: &Entry) -> Result<()> {
        let path = key.to_path(&self.root);
        if let Some(parent) = path.parent() {
            create_private_dir(parent)?;
        }

        let contents = toml::to_string(entry).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;

        trace!(path = %path.display(), versions = entry.versions.len(), "writing entry");
        write_private_file(&path, contents.as_bytes())
    }

    fn collect_keys(&self, dir: &Path, keys: &mut Vec<Key>) -> Result<()> {
        let read_err = |source| StoreError::ReadFailed {
            path: dir.to_path_buf(),
            source,
        };

        for dir_entry in fs::read_dir(dir).map_err(read_err)? {
            let dir_entry = dir_entry.map_err(read_err)?;
            if dir_entry.file_name().to_string_lossy().starts_with(HIDDEN_PREFIX) {
                continue;
            }

            let path = dir_entry.path();
            let file_type = dir_entry.file_type().map_err(read_err)?;

            if file_type.is_dir() {
                self.collect_keys(&path, keys)?;
            } else if file_type.is_file() || path.is_file() {
                let Ok(relative) = path.strip_prefix(&self.root) else {
                    continue;
                };
                if let Some(key) = Key::from_relative_path(relative) {
                    keys.push(key);
                }
            }
        }

        Ok(())
    }
}

/// Create `dir` and its parents, 0700 on Unix.
fn create_private_dir(dir: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }

    builder.create(dir).map_err(|source| {
        StoreError::WriteFailed {
            path: dir.to_path_buf(),
            source,
        }
        .into()
    })
}

/// Replace the contents of `path`, 0600 on Unix.
///
/// Writes `.<name>.tmp` next to the target and renames it over `path`, so
/// a failed write leaves the previous file untouched.
fn write_private_file(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let written = options.open(&tmp_path).and_then(|mut file| {
        file.write_all(contents)?;
        file.sync_all()
    });
    if let Err(source) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::WriteFailed {
            path: tmp_path,
            source,
        }
        .into());
    }

    fs::rename(&tmp_path, path).map_err(|source| {
        let _ = fs::remove_file(&tmp_path);
        StoreError::WriteFailed {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}
