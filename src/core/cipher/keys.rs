//! Key pairs and key files.
//!
//! Recipient and identity files share one line-oriented format: one key per
//! line, blank lines and `#` comments ignored. Lines that do not parse are
//! skipped so a single bad line never blocks the rest of the file.

use std::fs;
use std::io::Write;
use std::path::Path;

use ::age::secrecy::ExposeSecret;
use ::age::x25519;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::{parse_identity, parse_recipient};
use crate::core::constants::COMMENT_PREFIX;
use crate::error::{CipherError, Result, StoreError};

/// A freshly generated identity and its public recipient.
pub struct KeyPair {
    /// `AGE-SECRET-KEY-...`, wiped on drop.
    pub identity: Zeroizing<String>,
    /// `age1...`
    pub recipient: String,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("identity", &"<redacted>")
            .field("recipient", &self.recipient)
            .finish()
    }
}

impl KeyPair {
    /// Generate an independent x25519 key pair.
    pub fn generate() -> Self {
        let identity = x25519::Identity::generate();
        let recipient = identity.to_public().to_string();
        let secret = identity.to_string();

        Self {
            identity: Zeroizing::new(secret.expose_secret().to_string()),
            recipient,
        }
    }

    /// Write the identity to `path` so that [`load_identities`] can read it back.
    ///
    /// Creates missing parent directories. The file is 0600 on Unix.
    pub fn write_identity_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::WriteFailed {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let contents = Zeroizing::new(format!(
            "# pf identity\n# public key: {}\n{}\n",
            self.recipient,
            self.identity.as_str()
        ));

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let write_err = |source| StoreError::WriteFailed {
            path: path.to_path_buf(),
            source,
        };
        let mut file = options.open(path).map_err(write_err)?;
        file.write_all(contents.as_bytes()).map_err(write_err)?;

        debug!(path = %path.display(), "identity written");
        Ok(())
    }
}

/// Non-empty, non-comment lines of a key file.
fn key_lines(contents: &str) -> impl Iterator<Item = &str> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_PREFIX))
}

/// Load every valid identity from `path`.
///
/// # Errors
///
/// Returns `StoreError::ReadFailed` if the file cannot be read and
/// `CipherError::NoValidIdentities` if it holds no parseable identity.
pub fn load_identities(path: &Path) -> Result<Vec<x25519::Identity>> {
    debug!(path = %path.display(), "loading identities");

    let contents = Zeroizing::new(fs::read_to_string(path).map_err(|source| {
        StoreError::ReadFailed {
            path: path.to_path_buf(),
            source,
        }
    })?);

    let mut identities = Vec::new();
    for (index, line) in key_lines(&contents).enumerate() {
        match parse_identity(line) {
            Ok(identity) => identities.push(identity),
            Err(_) => debug!(line = index + 1, "skipping unparseable identity line"),
        }
    }

    if identities.is_empty() {
        return Err(CipherError::NoValidIdentities(path.to_path_buf()).into());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = fs::metadata(path) {
            let mode = metadata.permissions().mode() & 0o777;
            if mode & 0o077 != 0 {
                warn!(
                    path = %path.display(),
                    mode = %format!("{:o}", mode),
                    "insecure identity file permissions"
                );
            }
        }
    }

    debug!(count = identities.len(), "identities loaded");
    Ok(identities)
}

/// Load every valid recipient from `path`.
///
/// A missing file yields an empty set; invalid lines are dropped.
///
/// # Errors
///
/// Returns `StoreError::ReadFailed` for read errors other than not-found.
pub fn load_recipients(path: &Path) -> Result<Vec<String>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no recipients file");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(StoreError::ReadFailed {
                path: path.to_path_buf(),
                source,
            }
            .into())
        }
    };

    let recipients: Vec<String> = key_lines(&contents)
        .filter(|line| match parse_recipient(line) {
            Ok(_) => true,
            Err(_) => {
                debug!(recipient = %line, "skipping invalid recipient");
                false
            }
        })
        .map(str::to_string)
        .collect();

    debug!(count = recipients.len(), "recipients loaded");
    Ok(recipients)
}
