//! Entry file model.
//!
//! One TOML document per key:
//!
//! ```toml
//! key = "email/work"
//!
//! [[versions]]
//! version = 1
//! password = "-----BEGIN AGE ENCRYPTED FILE-----\n..."
//! timestamp = 1767225600
//! author = "alice"
//! message = "initial"
//! ```

use serde::{Deserialize, Serialize};

/// All versions of one secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub key: String,
    #[serde(default)]
    pub versions: Vec<Version>,
}

/// One immutable value of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// 1-based, unique within the entry.
    pub version: u32,
    /// Armored ciphertext. Empty in history listings.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl Entry {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            versions: Vec::new(),
        }
    }

    /// Current (last) version.
    pub fn latest(&self) -> Option<&Version> {
        self.versions.last()
    }

    /// Pick version `requested`, or the latest if it is out of range.
    ///
    /// Zero and negative numbers mean "latest", as does anything past the end.
    pub fn select(&self, requested: i64) -> Option<&Version> {
        let len = self.versions.len();
        match usize::try_from(requested) {
            Ok(n) if n >= 1 && n <= len => self.versions.get(n - 1),
            _ => self.latest(),
        }
    }

    /// Append a version numbered after the last one and return its number.
    pub fn push(
        &mut self,
        password: String,
        timestamp: i64,
        author: impl Into<String>,
        message: impl Into<String>,
    ) -> u32 {
        let version = self.next_version();
        self.versions.push(Version {
            version,
            password,
            timestamp,
            author: author.into(),
            message: message.into(),
        });
        version
    }

    fn next_version(&self) -> u32 {
        u32::try_from(self.versions.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1)
    }

    /// Versions newest first, ciphertext removed.
    ///
    /// A positive `limit` keeps only that many; zero or negative keeps all.
    pub fn history(&self, limit: i64) -> Vec<Version> {
        let take = usize::try_from(limit)
            .ok()
            .filter(|&n| n > 0)
            .unwrap_or(usize::MAX);

        self.versions
            .iter()
            .rev()
            .take(take)
            .map(|v| Version {
                password: String::new(),
                ..v.clone()
            })
            .collect()
    }
}
