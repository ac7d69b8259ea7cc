//! Section resolution
//!
//! An option is looked up in the requested section first, then in each
//! ancestor obtained by dropping the last path segment. The nearest
//! definition wins. Source order never matters here, it was already settled
//! when the store merged documents. Siblings are never consulted.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use bsf_core::{BsfError, Environment, PathNormalizer, ResolvedValue, Section, SectionPath};

use crate::limits::parse_bool;
use crate::store::ConfigStore;
use crate::ConfigResult;

/// Ancestor-walking lookups over an immutable store
#[derive(Debug, Clone, Copy)]
pub struct SectionResolver<'a> {
    store: &'a ConfigStore,
}

impl<'a> SectionResolver<'a> {
    pub fn new(store: &'a ConfigStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &'a ConfigStore {
        self.store
    }

    /// Nearest section on the chain of `path` that defines `option`
    fn find(&self, path: &SectionPath, option: &str) -> Option<(&'a Section, &'a str)> {
        for candidate in path.ancestors() {
            match self.store.get_section(&candidate) {
                Some(section) => {
                    if let Some(value) = section.get(option) {
                        tracing::trace!(%path, option, origin = %candidate, "option resolved");
                        return Some((section, value));
                    }
                },
                None => {
                    tracing::trace!(%path, section = %candidate, "section not declared, skipping");
                },
            }
        }
        None
    }

    /// Effective value of `option` for `path`
    ///
    /// Returns the nearest definition on the ancestor chain, else the
    /// fallback, else `Absent`.
    pub fn resolve(&self, path: &SectionPath, option: &str, fallback: Option<&str>) -> ResolvedValue {
        match self.find(path, option) {
            Some((section, value)) => ResolvedValue::Found {
                value: value.to_string(),
                origin: section.path.clone(),
            },
            None => match fallback {
                Some(value) => ResolvedValue::Fallback {
                    value: value.to_string(),
                },
                None => ResolvedValue::Absent,
            },
        }
    }

    /// Raw value of `option` for `path`, without a fallback
    pub fn get(&self, path: &SectionPath, option: &str) -> Option<&'a str> {
        self.find(path, option).map(|(_, value)| value)
    }

    /// Boolean option using the INI vocabulary 1/yes/true/on and 0/no/false/off
    pub fn resolve_bool(
        &self,
        path: &SectionPath,
        option: &str,
        fallback: Option<&str>,
    ) -> ConfigResult<Option<bool>> {
        let resolved = self.resolve(path, option, fallback);
        let Some(raw) = resolved.as_str() else {
            return Ok(None);
        };

        parse_bool(raw)
            .map(Some)
            .ok_or_else(|| BsfError::InvalidBoolean {
                section: resolved.origin().unwrap_or(path).to_string(),
                option: option.to_string(),
                value: raw.to_string(),
            })
    }

    /// Path-valued option, expanded and rooted by `normalizer`
    pub fn resolve_path<E: Environment>(
        &self,
        path: &SectionPath,
        option: &str,
        fallback: Option<&str>,
        normalizer: &PathNormalizer<E>,
        default_root: Option<&Path>,
    ) -> ConfigResult<Option<PathBuf>> {
        match self.resolve(path, option, fallback).as_str() {
            Some(raw) => normalizer.normalize(raw, default_root).map(Some),
            None => Ok(None),
        }
    }

    /// Every option visible from `path` with the definition that wins
    ///
    /// Options defined closer to `path` come first.
    pub fn effective_options(&self, path: &SectionPath) -> IndexMap<String, ResolvedValue> {
        let mut options = IndexMap::new();

        for candidate in path.ancestors() {
            let Some(section) = self.store.get_section(&candidate) else {
                continue;
            };

            for (option, value) in &section.options {
                options
                    .entry(option.clone())
                    .or_insert_with(|| ResolvedValue::Found {
                        value: value.clone(),
                        origin: section.path.clone(),
                    });
            }
        }

        options
    }
}
