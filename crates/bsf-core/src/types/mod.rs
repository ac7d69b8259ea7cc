//! Core data types of a configuration hierarchy.
//!
//! This module provides the fundamental types used throughout BSF:
//! - Section paths locating a node in the dotted hierarchy
//! - Sections holding ordered option values
//! - Resolution results distinguishing found, fallback and absent values

pub mod section;
pub mod section_path;
pub mod value;

// Re-export all public types
pub use section::Section;
pub use section_path::{Ancestors, SectionPath, SECTION_DELIMITER};
pub use value::ResolvedValue;
