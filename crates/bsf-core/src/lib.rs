//! # bsf-core
//!
//! Core types and utilities shared across all BSF crates.
//!
//! This crate provides:
//! - SectionPath, Section and ResolvedValue, the data model of a configuration hierarchy
//! - BsfError enum for unified error handling
//! - PathNormalizer for home and variable expansion of path-valued options
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (SectionPath, Section, ResolvedValue)
//! - `error`: Error types and result aliases
//! - `utils`: Path normalization and environment access

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{BsfError, BsfResult};
pub use types::{ResolvedValue, Section, SectionPath, SECTION_DELIMITER};
pub use utils::{Environment, MapEnvironment, PathNormalizer, SystemEnvironment};
