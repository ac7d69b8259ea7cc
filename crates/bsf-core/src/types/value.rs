//! Resolution results.

use serde::Serialize;

use super::SectionPath;

/// Outcome of looking up an option along a section's ancestor chain
///
/// `Found` with an empty string means the option was defined but empty,
/// which is different from `Absent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedValue {
    /// Defined in `origin`, the given path or one of its ancestors
    Found { value: String, origin: SectionPath },

    /// Not defined anywhere on the chain, caller fallback used
    Fallback { value: String },

    /// Not defined and no fallback supplied
    Absent,
}

impl ResolvedValue {
    /// The effective raw value, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ResolvedValue::Found { value, .. } | ResolvedValue::Fallback { value } => Some(value),
            ResolvedValue::Absent => None,
        }
    }

    /// Consume into the effective raw value, if any
    pub fn into_option(self) -> Option<String> {
        match self {
            ResolvedValue::Found { value, .. } | ResolvedValue::Fallback { value } => Some(value),
            ResolvedValue::Absent => None,
        }
    }

    /// Section that defined the value, `None` for fallback or absent
    pub fn origin(&self) -> Option<&SectionPath> {
        match self {
            ResolvedValue::Found { origin, .. } => Some(origin),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, ResolvedValue::Absent)
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ResolvedValue::Found { .. })
    }
}
