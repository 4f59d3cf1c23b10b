//! Error types.
//!
//! Each area of the vault has its own error enum; they all fold into
//! [`Error`] so callers can use a single `Result` type.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this is a "no such entry" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Store(StoreError::NotFound(_)))
    }

    /// Whether the ciphertext could not be opened with the available identities.
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self, Error::Cipher(CipherError::DecryptionFailed(_)))
    }
}

/// Encryption layer errors.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("no recipients configured")]
    NoRecipients,

    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("invalid identity: {0}")]
    InvalidIdentity(&'static str),

    #[error("no identities available for decryption")]
    NoIdentities,

    #[error("no valid identities found in {}", .0.display())]
    NoValidIdentities(PathBuf),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("armor encoding failed: {0}")]
    ArmorFailed(String),
}

/// Entry store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("entry '{0}' not found")]
    NotFound(String),

    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("failed to read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse entry {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize entry '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: toml::ser::Error,
    },

    #[error("entry '{0}' has no versions")]
    Empty(String),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no store configured: pass --store or set PF_STORE")]
    MissingStore,

    #[error("not a store directory: {}", .0.display())]
    NotAStore(PathBuf),

    #[error("store already initialized at {}", .0.display())]
    AlreadyInitialized(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
