//! Hierarchical entry keys.
//!
//! A key like `email/work` maps to `<root>/email/work.toml`. Segments become
//! directories and the last segment gets the entry extension. Keys are
//! validated so the mapping stays reversible: anything [`Key::parse`]
//! accepts is reported back verbatim by a directory listing.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::core::constants::{ENTRY_EXTENSION, HIDDEN_PREFIX};
use crate::error::{Error, Result, StoreError};

/// Separator between key segments.
pub const SEPARATOR: char = '/';

/// A validated, slash-delimited entry key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(String);

impl Key {
    /// Validate `raw` as an entry key.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidKey` for empty keys or segments, `.` and
    /// `..` segments, segments starting with `.`, backslashes and NUL bytes.
    /// Directory segments may not end in the entry extension: `a.toml/x`
    /// would need a directory where the entry file for `a` lives.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |reason| -> Error {
            StoreError::InvalidKey {
                key: raw.to_string(),
                reason,
            }
            .into()
        };

        if raw.is_empty() {
            return Err(invalid("key is empty"));
        }
        if raw.contains('\\') {
            return Err(invalid("backslashes are not allowed"));
        }
        if raw.contains('\0') {
            return Err(invalid("NUL bytes are not allowed"));
        }

        let entry_suffix = format!(".{}", ENTRY_EXTENSION);
        let mut segments = raw.split(SEPARATOR).peekable();
        while let Some(segment) = segments.next() {
            if segment.is_empty() {
                return Err(invalid("empty path segment"));
            }
            if segment.starts_with(HIDDEN_PREFIX) {
                return Err(invalid("segments may not start with '.'"));
            }
            if segments.peek().is_some() && segment.ends_with(entry_suffix.as_str()) {
                return Err(invalid("directory segments may not end in '.toml'"));
            }
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key segments, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR)
    }

    /// Entry file for this key under `root`.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        let mut segments = self.segments().peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_some() {
                path.push(segment);
            } else {
                path.push(format!("{}.{}", segment, ENTRY_EXTENSION));
            }
        }
        path
    }

    /// Recover a key from an entry file path relative to the store root.
    ///
    /// Returns `None` for paths that are not entry files: wrong extension,
    /// hidden components, or anything [`Key::parse`] would reject.
    pub fn from_relative_path(relative: &Path) -> Option<Self> {
        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(name) => segments.push(name.to_str()?),
                _ => return None,
            }
        }

        let last = segments.pop()?;
        let stem = last.strip_suffix(ENTRY_EXTENSION)?.strip_suffix('.')?;
        segments.push(stem);

        let separator = SEPARATOR.to_string();
        Self::parse(&segments.join(separator.as_str())).ok()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
