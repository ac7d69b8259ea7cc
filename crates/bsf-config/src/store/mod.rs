//! Layered configuration store
//!
//! Documents are merged in order: sections are matched by exact path and
//! their options merge key by key, later documents winning. Keys a later
//! document does not mention survive. The store is immutable once built.

use indexmap::IndexMap;

use bsf_core::{BsfError, Section, SectionPath};

use crate::ini::{parse_document, Document};
use crate::limits::ResourceLimitResolver;
use crate::resolver::SectionResolver;
use crate::ConfigResult;

#[cfg(test)]
mod tests;

/// Merged sections of one or more configuration documents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigStore {
    /// Sections in order of first appearance
    sections: IndexMap<SectionPath, Section>,
    /// Names of the merged documents, in load order
    sources: Vec<String>,
}

impl ConfigStore {
    /// A store without any sections
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse and merge documents, later documents override earlier ones
    pub fn load(documents: &[Document]) -> ConfigResult<Self> {
        let mut store = Self::empty();

        for document in documents {
            let occurrences = parse_document(document)?;
            tracing::debug!(
                source = %document.name,
                sections = occurrences.len(),
                "merging configuration document"
            );
            store.absorb(occurrences);
            store.sources.push(document.name.clone());
        }

        tracing::debug!(
            sources = store.sources.len(),
            sections = store.sections.len(),
            "configuration store loaded"
        );
        Ok(store)
    }

    /// Load a single anonymous document
    pub fn load_str(text: &str) -> ConfigResult<Self> {
        Self::load(&[Document::new("<string>", text)])
    }

    /// Merge section occurrences in order
    fn absorb(&mut self, occurrences: Vec<Section>) {
        for occurrence in occurrences {
            match self.sections.get_mut(&occurrence.path) {
                Some(existing) => existing.merge_from(&occurrence),
                None => {
                    self.sections.insert(occurrence.path.clone(), occurrence);
                },
            }
        }
    }

    /// New store with `other` layered on top of this one
    pub fn merge(&self, other: &ConfigStore) -> ConfigStore {
        let mut merged = self.clone();
        merged.absorb(other.sections.values().cloned().collect());
        merged.sources.extend(other.sources.iter().cloned());
        merged
    }

    /// Section with exactly this path, without walking ancestors
    pub fn get_section(&self, path: &SectionPath) -> Option<&Section> {
        self.sections.get(path)
    }

    /// Section with exactly this path, or an error naming the sources
    pub fn require_section(&self, path: &SectionPath) -> ConfigResult<&Section> {
        self.get_section(path).ok_or_else(|| BsfError::SectionNotFound {
            section: path.to_string(),
            sources: self.sources.join(", "),
        })
    }

    pub fn has_section(&self, path: &SectionPath) -> bool {
        self.sections.contains_key(path)
    }

    /// Check if the option is defined directly in this exact section
    pub fn has_option(&self, path: &SectionPath, option: &str) -> bool {
        self.get_section(path)
            .map(|section| section.contains(option))
            .unwrap_or(false)
    }

    /// All sections in order of first appearance
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    pub fn section_paths(&self) -> impl Iterator<Item = &SectionPath> {
        self.sections.keys()
    }

    /// Names of the documents merged into this store
    pub fn source_names(&self) -> &[String] {
        &self.sources
    }

    /// Number of distinct sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Ancestor-walking option lookups over this store
    pub fn resolver(&self) -> SectionResolver<'_> {
        SectionResolver::new(self)
    }

    /// Typed size, duration and integer lookups over this store
    pub fn limits(&self) -> ResourceLimitResolver<'_> {
        ResourceLimitResolver::new(self.resolver())
    }
}
