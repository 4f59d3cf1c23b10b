//! pf - A versioned, age-encrypted password store.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── commands      # One handler per subcommand
//! │   └── output        # Terminal output helpers
//! └── core/             # Core library components
//!     ├── cipher/       # age encryption, key pairs, key files
//!     ├── audit         # Append-only audit log
//!     ├── config        # Resolved store configuration
//!     └── store/        # Versioned entry store
//!         ├── entry     # Entry file model
//!         └── key       # Key <-> path mapping
//! ```
//!
//! # Example
//!
//! ```no_run
//! use pf::core::config::StoreConfig;
//! use pf::Store;
//!
//! # fn main() -> pf::error::Result<()> {
//! let config = StoreConfig::new("/home/alice/.pf/stores/personal")
//!     .with_identity_file("/home/alice/.pf/age-key.txt");
//! let store = Store::open(&config)?;
//!
//! store.put("email/work", "hunter2", "initial")?;
//! let password = store.get("email/work", 0)?;
//! assert_eq!(password.as_str(), "hunter2");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::audit::{AuditLog, Event};
pub use crate::core::config::{AuditConfig, StoreConfig};
pub use crate::core::store::{Entry, Key, Store, Version};
pub use crate::error::{Error, Result};
