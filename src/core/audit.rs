//! Audit log.
//!
//! Appends one human-readable line per event to `<store>/.audit.log`:
//!
//! ```text
//! 2026-01-02T15:04:05+01:00 | alice | MODIFY | email/work | rotated
//! ```
//!
//! Logging never fails the caller. If the file cannot be opened or written
//! the event is dropped with a warning and the store operation proceeds.
//! Each call opens, appends and closes the file, so concurrent writers
//! interleave whole lines.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, SecondsFormat};
use tracing::{trace, warn};

use crate::core::config::AuditConfig;
use crate::core::constants;

/// Kind of audited event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Access,
    Modify,
    Delete,
    Export,
    Import,
}

impl Event {
    /// Upper-case tag written to the log.
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Access => "ACCESS",
            Event::Modify => "MODIFY",
            Event::Delete => "DELETE",
            Event::Export => "EXPORT",
            Event::Import => "IMPORT",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only audit logger for one store.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
    config: AuditConfig,
}

impl AuditLog {
    /// Logger writing to `path`.
    pub fn new(path: impl Into<PathBuf>, config: AuditConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    /// Logger writing to the audit file inside a store root.
    pub fn for_store(root: &Path, config: AuditConfig) -> Self {
        Self::new(root.join(constants::AUDIT_LOG_FILE), config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    /// Actor recorded on every line.
    pub fn actor(&self) -> &str {
        &self.config.actor
    }

    /// Record an event. Fire-and-forget.
    pub fn log(&self, event: Event, key: &str, details: Option<&str>) {
        if !self.config.enabled {
            return;
        }

        let line = self.format_line(event, key, details);
        match self.append(&line) {
            Ok(()) => trace!(event = %event, key = %key, "audit event recorded"),
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "failed to write audit log"
            ),
        }
    }

    fn format_line(&self, event: Event, key: &str, details: Option<&str>) -> String {
        let timestamp = Local::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let actor = if self.config.actor.trim().is_empty() {
            constants::UNKNOWN_ACTOR
        } else {
            self.config.actor.as_str()
        };

        let mut line = format!("{} | {} | {} | {}", timestamp, actor, event, key);
        if let Some(details) = details.filter(|d| !d.is_empty()) {
            line.push_str(" | ");
            line.push_str(details);
        }

        // One event, one line.
        let mut line = line.replace(['\r', '\n'], " ");
        line.push('\n');
        line
    }

    fn append(&self, line: &str) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}
