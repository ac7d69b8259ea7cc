//! Configuration sections.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::SectionPath;

/// A node of the configuration hierarchy with its option values
///
/// Options keep the order in which they were first defined. A section
/// without options is still a valid node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Position in the hierarchy
    pub path: SectionPath,

    /// Raw option values keyed by case-sensitive option name
    #[serde(default)]
    pub options: IndexMap<String, String>,
}

impl Section {
    /// Create an empty section
    pub fn new(path: SectionPath) -> Self {
        Self {
            path,
            options: IndexMap::new(),
        }
    }

    /// Raw value of an option defined directly in this section
    pub fn get(&self, option: &str) -> Option<&str> {
        self.options.get(option).map(String::as_str)
    }

    /// Check if the option is defined directly in this section
    pub fn contains(&self, option: &str) -> bool {
        self.options.contains_key(option)
    }

    /// Set an option, returning the value it replaced
    pub fn insert(&mut self, option: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.options.insert(option.into(), value.into())
    }

    /// Overlay another section's options, the other section wins per key
    pub fn merge_from(&mut self, other: &Section) {
        for (option, value) in &other.options {
            self.options.insert(option.clone(), value.clone());
        }
    }

    /// Option names in definition order
    pub fn option_names(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }

    /// Number of options defined in this section
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Check if the section defines no options
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}
