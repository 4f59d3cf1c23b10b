//! Constants used throughout pf.
//!
//! Centralizes file names and environment variable names.

/// Recipients file inside a store root.
pub const RECIPIENTS_FILE: &str = ".recipients";

/// Audit log file inside a store root.
pub const AUDIT_LOG_FILE: &str = ".audit.log";

/// Extension given to every entry file (without the dot).
pub const ENTRY_EXTENSION: &str = "toml";

/// Prefix marking hidden files and directories, which never hold entries.
pub const HIDDEN_PREFIX: char = '.';

/// Comment marker in recipients and identity files.
pub const COMMENT_PREFIX: char = '#';

/// Default identity file relative to HOME (~/.pf/age-key.txt).
pub const DEFAULT_IDENTITY_FILE: &str = ".pf/age-key.txt";

/// Set to `false` to disable audit logging.
pub const AUDIT_ENV: &str = "PF_AUDIT";

/// Environment variable naming the acting user.
pub const USER_ENV: &str = "USER";

/// Actor recorded when the caller cannot be resolved.
pub const UNKNOWN_ACTOR: &str = "unknown";
