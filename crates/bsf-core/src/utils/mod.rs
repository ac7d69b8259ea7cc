//! Utility functions and helpers.
//!
//! Path normalization and environment access used by the configuration crates.

pub mod env;
pub mod path;

// Re-export commonly used utilities
pub use env::{Environment, MapEnvironment, SystemEnvironment};
pub use path::{normalize_path, PathNormalizer};
