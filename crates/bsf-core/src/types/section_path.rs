//! Dotted section paths.
//!
//! A `SectionPath` is a non-empty sequence of segments such as
//! `["bsf", "analyses", "bwa", "BWA"]`, written `bsf.analyses.bwa.BWA`.
//! Dropping the last segment yields the parent, which acts as the fallback
//! for options the child does not set.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{BsfError, BsfResult};

/// Separator between section path segments
pub const SECTION_DELIMITER: char = '.';

/// Position of a section in the configuration hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionPath {
    segments: Vec<String>,
}

impl SectionPath {
    /// Create a section path from individual segments
    pub fn new<I, S>(segments: I) -> BsfResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(BsfError::InvalidSectionPath {
                path: String::new(),
                reason: "a section path needs at least one segment".to_string(),
            });
        }

        for segment in &segments {
            validate_segment(segment).map_err(|reason| BsfError::InvalidSectionPath {
                path: segments.join("."),
                reason,
            })?;
        }

        Ok(Self { segments })
    }

    /// Parse a dotted section name such as `bsf.Analysis.DRMS`
    pub fn parse(input: &str) -> BsfResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(BsfError::InvalidSectionPath {
                path: input.to_string(),
                reason: "section name is empty".to_string(),
            });
        }

        let mut segments = Vec::new();
        for segment in trimmed.split(SECTION_DELIMITER) {
            validate_segment(segment).map_err(|reason| BsfError::InvalidSectionPath {
                path: trimmed.to_string(),
                reason,
            })?;
            segments.push(segment.to_string());
        }

        Ok(Self { segments })
    }

    /// Segments from the root to this section
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments (always at least one)
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false, a section path has at least one segment
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, the section's own name
    pub fn name(&self) -> &str {
        // Non-empty by construction
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Path with the last segment dropped, `None` for a root section
    pub fn parent(&self) -> Option<SectionPath> {
        if self.segments.len() < 2 {
            return None;
        }

        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Path extended by one segment
    pub fn child(&self, segment: &str) -> BsfResult<SectionPath> {
        validate_segment(segment).map_err(|reason| BsfError::InvalidSectionPath {
            path: format!("{}{}{}", self, SECTION_DELIMITER, segment),
            reason,
        })?;

        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(Self { segments })
    }

    /// This path followed by each ancestor, most specific first
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            path: self,
            depth: self.segments.len(),
        }
    }

    /// Check if `other` lies strictly below this path
    pub fn is_ancestor_of(&self, other: &SectionPath) -> bool {
        other.segments.len() > self.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }

    /// Prefix of this path with `depth` segments
    fn prefix(&self, depth: usize) -> SectionPath {
        Self {
            segments: self.segments[..depth].to_vec(),
        }
    }
}

/// Iterator over a section path and its ancestors
pub struct Ancestors<'a> {
    path: &'a SectionPath,
    depth: usize,
}

impl Iterator for Ancestors<'_> {
    type Item = SectionPath;

    fn next(&mut self) -> Option<Self::Item> {
        if self.depth == 0 {
            return None;
        }

        let item = self.path.prefix(self.depth);
        self.depth -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.depth, Some(self.depth))
    }
}

impl ExactSizeIterator for Ancestors<'_> {}

/// Check a single segment, returning the reason it is rejected
fn validate_segment(segment: &str) -> Result<(), String> {
    if segment.is_empty() {
        return Err("empty segment".to_string());
    }

    if let Some(c) = segment
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '[' | ']') || *c == SECTION_DELIMITER)
    {
        return Err(format!("segment '{}' contains invalid character {:?}", segment, c));
    }

    Ok(())
}

impl fmt::Display for SectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                write!(f, "{}", SECTION_DELIMITER)?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl FromStr for SectionPath {
    type Err = BsfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for SectionPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SectionPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        SectionPath::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_and_display() {
        let path = SectionPath::parse("bsf.analyses.bwa.BWA").unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.name(), "BWA");
        assert_eq!(path.to_string(), "bsf.analyses.bwa.BWA");
    }

    #[test]
    fn test_parse_rejects_bad_names() {
        assert!(SectionPath::parse("").is_err());
        assert!(SectionPath::parse("   ").is_err());
        assert!(SectionPath::parse("a..b").is_err());
        assert!(SectionPath::parse(".a").is_err());
        assert!(SectionPath::parse("a.").is_err());
        assert!(SectionPath::parse("a.b c").is_err());
        assert!(SectionPath::parse("a.[b]").is_err());
    }

    #[test]
    fn test_segments_are_case_sensitive() {
        let upper = SectionPath::parse("bsf.DRMS").unwrap();
        let lower = SectionPath::parse("bsf.drms").unwrap();
        assert_ne!(upper, lower);
    }

    #[test]
    fn test_new_rejects_delimiter_in_segment() {
        assert!(SectionPath::new(["bsf", "a.b"]).is_err());
        assert!(SectionPath::new(Vec::<String>::new()).is_err());
        assert_eq!(
            SectionPath::new(["bsf", "DRMS"]).unwrap(),
            SectionPath::parse("bsf.DRMS").unwrap()
        );
    }

    #[test]
    fn test_parent_and_child() {
        let path = SectionPath::parse("bsf.Analysis.DRMS").unwrap();
        assert_eq!(path.parent().unwrap().to_string(), "bsf.Analysis");
        assert!(SectionPath::parse("bsf").unwrap().parent().is_none());

        let child = path.child("align").unwrap();
        assert_eq!(child.to_string(), "bsf.Analysis.DRMS.align");
        assert!(path.child("bad.name").is_err());
    }

    #[test]
    fn test_ancestors_most_specific_first() {
        let path = SectionPath::parse("a.b.c").unwrap();
        let names: Vec<String> = path.ancestors().map(|p| p.to_string()).collect();
        assert_eq!(names, vec!["a.b.c", "a.b", "a"]);
        assert_eq!(path.ancestors().len(), 3);
    }

    #[test]
    fn test_is_ancestor_of() {
        let root = SectionPath::parse("a.b").unwrap();
        assert!(root.is_ancestor_of(&SectionPath::parse("a.b.c").unwrap()));
        assert!(!root.is_ancestor_of(&root));
        assert!(!root.is_ancestor_of(&SectionPath::parse("a.bc").unwrap()));
        assert!(!root.is_ancestor_of(&SectionPath::parse("a").unwrap()));
    }

    #[test]
    fn test_serde_as_string() {
        let path = SectionPath::parse("bsf.DRMS").unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"bsf.DRMS\"");
        let back: SectionPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }

    proptest! {
        #[test]
        fn test_ancestor_chain_shrinks_by_one(segments in prop::collection::vec("[A-Za-z_][A-Za-z0-9_]{0,8}", 1..6)) {
            let path = SectionPath::new(segments.clone()).unwrap();
            let chain: Vec<SectionPath> = path.ancestors().collect();
            prop_assert_eq!(chain.len(), segments.len());
            for window in chain.windows(2) {
                let parent = window[0].parent();
                prop_assert_eq!(parent.as_ref(), Some(&window[1]));
                prop_assert!(window[1].is_ancestor_of(&window[0]));
            }
        }
    }
}
