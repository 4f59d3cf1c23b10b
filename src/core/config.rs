//! Resolved store configuration.
//!
//! The vault never parses user configuration files itself. Callers hand it
//! an already-resolved [`StoreConfig`]; the only ambient lookups live in
//! [`AuditConfig::from_env`] and [`default_identity_file`], and both are
//! opt-in so tests can inject deterministic values.

use std::env;
use std::path::{Path, PathBuf};

use crate::core::constants;

/// Everything needed to open a store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding entry files, the recipients list and the audit log.
    pub root: PathBuf,
    /// File of private keys used for decryption, if any.
    pub identity_file: Option<PathBuf>,
    /// Audit settings.
    pub audit: AuditConfig,
}

impl StoreConfig {
    /// Configuration for `root` with no identities and audit settings from the environment.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            identity_file: None,
            audit: AuditConfig::from_env(),
        }
    }

    /// Set the identity file.
    pub fn with_identity_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.identity_file = Some(path.into());
        self
    }

    /// Replace the audit settings.
    pub fn with_audit(mut self, audit: AuditConfig) -> Self {
        self.audit = audit;
        self
    }

    /// Path of the recipients file.
    pub fn recipients_path(&self) -> PathBuf {
        self.root.join(constants::RECIPIENTS_FILE)
    }

    /// Path of the audit log.
    pub fn audit_log_path(&self) -> PathBuf {
        self.root.join(constants::AUDIT_LOG_FILE)
    }
}

/// Audit logger settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    /// When false, logging is a no-op.
    pub enabled: bool,
    /// Recorded as the actor of every event and as the author of new versions.
    pub actor: String,
}

impl AuditConfig {
    /// Enabled logging attributed to `actor`.
    pub fn new(actor: impl Into<String>) -> Self {
        Self {
            enabled: true,
            actor: actor.into(),
        }
    }

    /// Logging switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            actor: resolve_actor(),
        }
    }

    /// Read settings from the process environment.
    ///
    /// `PF_AUDIT=false` disables logging. The actor comes from `USER`,
    /// then the OS user name, then `"unknown"`.
    pub fn from_env() -> Self {
        let enabled = env::var(constants::AUDIT_ENV)
            .map(|v| !v.trim().eq_ignore_ascii_case("false"))
            .unwrap_or(true);

        Self {
            enabled,
            actor: resolve_actor(),
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Best-effort name of the calling user.
pub fn resolve_actor() -> String {
    if let Ok(user) = env::var(constants::USER_ENV) {
        if !user.trim().is_empty() {
            return user;
        }
    }

    match whoami::fallible::username() {
        Ok(name) if !name.trim().is_empty() => name,
        _ => constants::UNKNOWN_ACTOR.to_string(),
    }
}

/// `~/.pf/age-key.txt`, or `None` if HOME cannot be determined.
pub fn default_identity_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(constants::DEFAULT_IDENTITY_FILE))
}

/// Whether `root` looks like an initialized store.
pub fn is_store(root: &Path) -> bool {
    root.join(constants::RECIPIENTS_FILE).is_file()
}
