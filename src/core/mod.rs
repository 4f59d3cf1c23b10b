//! Core library components.
//!
//! The encryption layer, the audit logger and the versioned entry store,
//! plus the resolved configuration they are built from.

pub mod audit;
pub mod cipher;
pub mod config;
pub mod constants;
pub mod store;
