//! Shared configuration types for the AS/400 dialect adapter.

// Configuration types shared across all adapter crates
pub mod config;

pub use config::{As400Config, ConfigError, DriverKind};

/// Name reported by the adapter.
pub const ADAPTER_NAME: &str = "AS400";

/// Value of `CURRENT_SCHEMA` when the session uses system naming.
pub const SYSTEM_NAMING_SCHEMA: &str = "*LIBL";
