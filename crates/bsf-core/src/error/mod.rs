//! Error types and result aliases for BSF operations.
//!
//! Provides a unified error type that covers every failure of loading,
//! resolving and normalizing configuration values, with actionable messages.

use thiserror::Error;

/// Unified error type for all BSF operations
#[derive(Error, Debug)]
pub enum BsfError {
    // Load errors
    #[error("Failed to parse {source_name}: {message} at line {line}")]
    Parse {
        source_name: String,
        line: usize,
        message: String,
    },

    #[error("Invalid section path '{path}': {reason}")]
    InvalidSectionPath { path: String, reason: String },

    #[error("Section '{section}' not defined in configuration sources [{sources}]")]
    SectionNotFound { section: String, sources: String },

    // Path errors
    #[error("Cannot normalize path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    // Typed value errors
    #[error("Option '{option}' in section '{section}' has an invalid size '{value}': {reason}")]
    InvalidUnit {
        section: String,
        option: String,
        value: String,
        reason: String,
    },

    #[error("Option '{option}' in section '{section}' has an invalid duration '{value}': {reason}")]
    InvalidDuration {
        section: String,
        option: String,
        value: String,
        reason: String,
    },

    #[error("Option '{option}' in section '{section}' has an invalid integer '{value}': {reason}")]
    InvalidInteger {
        section: String,
        option: String,
        value: String,
        reason: String,
    },

    #[error("Option '{option}' in section '{section}' has an invalid boolean '{value}'")]
    InvalidBoolean {
        section: String,
        option: String,
        value: String,
    },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for BSF operations
pub type BsfResult<T> = Result<T, BsfError>;

impl BsfError {
    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Create a parse error for a line of a named document
    pub fn parse(source_name: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            line,
            message: message.into(),
        }
    }

    /// Check if this error is local to a single resolution call
    ///
    /// Typed value and path errors leave the store usable; parse and IO
    /// errors mean the store could not be built at all.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BsfError::InvalidPath { .. }
                | BsfError::InvalidUnit { .. }
                | BsfError::InvalidDuration { .. }
                | BsfError::InvalidInteger { .. }
                | BsfError::InvalidBoolean { .. }
                | BsfError::SectionNotFound { .. }
        )
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            BsfError::Parse { .. } => {
                Some("Section headers look like [a.b.c] and options like 'key = value'")
            },
            BsfError::InvalidSectionPath { .. } => {
                Some("Section names are dot-separated identifiers without blanks, e.g. bsf.Analysis.DRMS")
            },
            BsfError::SectionNotFound { .. } => {
                Some("Declare the section, even with an empty body, in one of the configuration files")
            },
            BsfError::InvalidPath { .. } => Some("Set HOME or use an absolute path"),
            BsfError::InvalidUnit { .. } => {
                Some("Use an integer with an optional K, M, G or T suffix, e.g. 6G or 512M")
            },
            BsfError::InvalidDuration { .. } => {
                Some("Use HH:MM:SS or D-HH:MM:SS with minutes and seconds between 0 and 59")
            },
            BsfError::InvalidInteger { .. } => Some("Use a whole number within the allowed range"),
            BsfError::InvalidBoolean { .. } => {
                Some("Use one of 1/yes/true/on or 0/no/false/off")
            },
            BsfError::Io { .. } => None,
        }
    }
}
