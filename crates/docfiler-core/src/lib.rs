pub mod config;
pub mod extract;
pub mod model;
pub mod organize;
pub mod reply;

// Re-export for convenience
pub use config::{Config, ConfigError};
pub use extract::{FileKind, extract};
pub use organize::{AuditLog, OrganizeError, OrganizeOutcome, organize};
pub use reply::{ParseFailure, StructuredResult, parse_reply};
