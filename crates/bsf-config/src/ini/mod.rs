//! INI document parsing
//!
//! Documents consist of `[dotted.section.name]` headers followed by
//! `key = value` lines. Lines starting with `#` or `;` are comments and
//! blank lines are ignored. Keys and values are trimmed, and `key =` defines
//! an empty value.

use bsf_core::{BsfError, Section, SectionPath};
use serde::{Deserialize, Serialize};

use crate::ConfigResult;

/// A named raw configuration document
///
/// The name is only used in diagnostics, usually it is the file path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub text: String,
}

impl Document {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Parse a document into its section occurrences, in document order
///
/// The same header may occur more than once; every occurrence is returned
/// separately so the store can merge them in order. Within one occurrence
/// an option may only be defined once.
pub fn parse_document(document: &Document) -> ConfigResult<Vec<Section>> {
    let mut occurrences: Vec<Section> = Vec::new();

    for (index, raw_line) in document.text.lines().enumerate() {
        let line_number = index + 1;
        let line = if index == 0 {
            raw_line.trim_start_matches('\u{feff}')
        } else {
            raw_line
        };
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') {
            let path = parse_header(document, line_number, line)?;
            occurrences.push(Section::new(path));
            continue;
        }

        let Some(current) = occurrences.last_mut() else {
            return Err(BsfError::parse(
                &document.name,
                line_number,
                format!("option line '{}' before any section header", line),
            ));
        };

        let Some((key, value)) = line.split_once('=') else {
            return Err(BsfError::parse(
                &document.name,
                line_number,
                format!("expected 'key = value', found '{}'", line),
            ));
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(BsfError::parse(&document.name, line_number, "empty option name"));
        }

        if current.contains(key) {
            return Err(BsfError::parse(
                &document.name,
                line_number,
                format!("duplicate option '{}' in section [{}]", key, current.path),
            ));
        }

        current.insert(key, value.trim());
    }

    Ok(occurrences)
}

/// Parse a `[a.b.c]` header line
fn parse_header(document: &Document, line_number: usize, line: &str) -> ConfigResult<SectionPath> {
    let Some(inner) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) else {
        return Err(BsfError::parse(
            &document.name,
            line_number,
            format!("section header '{}' is missing its closing bracket", line),
        ));
    };

    SectionPath::parse(inner).map_err(|e| match e {
        BsfError::InvalidSectionPath { reason, .. } => BsfError::parse(
            &document.name,
            line_number,
            format!("malformed section header '{}': {}", line, reason),
        ),
        other => other,
    })
}
