//! Configuration store and resolution for BSF pipelines
//!
//! This crate parses layered INI documents into a hierarchy of dotted
//! sections and answers option lookups by walking from a section up to its
//! ancestors, with typed views for resource limits and scheduler settings.

pub mod drms;
pub mod ini;
pub mod limits;
pub mod loader;
pub mod resolver;
pub mod shared;
pub mod store;

// Re-export main types
pub use drms::JobResources;
pub use ini::{parse_document, Document};
pub use limits::{parse_bool, parse_duration, parse_int, parse_size, ResourceLimitResolver};
pub use loader::ConfigLoader;
pub use resolver::SectionResolver;
pub use shared::SharedConfig;
pub use store::ConfigStore;

pub use bsf_core::{BsfError, ResolvedValue, Section, SectionPath};

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, BsfError>;
