//! Job resource settings for the distributed resource management system
//!
//! Pipelines read scheduler settings from `DRMS` sections. The generic
//! defaults live in `<root>.DRMS`, analysis-wide settings in
//! `<analysis>.DRMS` and stage-specific ones in `<analysis>.DRMS.<stage>`.
//! Each layer only overrides what it sets.

use serde::{Deserialize, Serialize};

use bsf_core::{BsfError, Section, SectionPath};

use crate::limits::{parse_bool, parse_duration, parse_int, parse_size};
use crate::store::ConfigStore;
use crate::ConfigResult;

/// Section segment holding scheduler settings
pub const DRMS_SEGMENT: &str = "DRMS";

/// Resource settings of one job, unset fields are left to the scheduler
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResources {
    /// Scheduler backend, e.g. `slurm` or `bash`
    pub implementation: Option<String>,
    /// Hard memory limit in bytes
    pub memory_hard: Option<u64>,
    /// Soft memory limit in bytes
    pub memory_soft: Option<u64>,
    pub memory_free_mem: Option<u64>,
    pub memory_free_swap: Option<u64>,
    pub memory_free_virtual: Option<u64>,
    /// Wall clock limit in seconds
    pub time_limit: Option<u64>,
    pub threads: Option<i64>,
    pub queue: Option<String>,
    pub parallel_environment: Option<String>,
    pub hold: Option<String>,
    pub is_script: Option<bool>,
}

impl JobResources {
    /// `<analysis>.DRMS` or `<analysis>.DRMS.<stage>`
    pub fn drms_section(analysis: &SectionPath, stage: Option<&str>) -> ConfigResult<SectionPath> {
        let drms = analysis.child(DRMS_SEGMENT)?;
        match stage {
            Some(stage) => drms.child(stage),
            None => Ok(drms),
        }
    }

    /// Settings defined directly in the section at `path`, with `base`
    /// filling unset fields
    ///
    /// Ancestors of `path` are not consulted, so only `DRMS` sections take
    /// part when the paths come from `drms_section`.
    pub fn resolve(store: &ConfigStore, path: &SectionPath, base: &JobResources) -> ConfigResult<Self> {
        let Some(section) = store.get_section(path) else {
            tracing::trace!(%path, "no scheduler section, keeping inherited settings");
            return Ok(base.clone());
        };
        let values = DrmsValues { section };

        Ok(Self {
            implementation: values.text("implementation").or_else(|| base.implementation.clone()),
            memory_hard: values.size("memory_hard")?.or(base.memory_hard),
            memory_soft: values.size("memory_soft")?.or(base.memory_soft),
            memory_free_mem: values.size("memory_free_mem")?.or(base.memory_free_mem),
            memory_free_swap: values.size("memory_free_swap")?.or(base.memory_free_swap),
            memory_free_virtual: values.size("memory_free_virtual")?.or(base.memory_free_virtual),
            time_limit: values.duration("time_limit")?.or(base.time_limit),
            threads: values.threads("threads")?.or(base.threads),
            queue: values.text("queue").or_else(|| base.queue.clone()),
            parallel_environment: values
                .text("parallel_environment")
                .or_else(|| base.parallel_environment.clone()),
            hold: values.text("hold").or_else(|| base.hold.clone()),
            is_script: values.boolean("is_script")?.or(base.is_script),
        })
    }

    /// Resolve each path in turn, every layer on top of the previous one
    pub fn resolve_layered(
        store: &ConfigStore,
        paths: &[SectionPath],
        defaults: &JobResources,
    ) -> ConfigResult<Self> {
        paths
            .iter()
            .try_fold(defaults.clone(), |base, path| Self::resolve(store, path, &base))
    }

    /// Settings for one stage of an analysis
    ///
    /// Layers `<root>.DRMS`, where `<root>` is the first segment of the
    /// analysis path, then `<analysis>.DRMS`, then `<analysis>.DRMS.<stage>`.
    /// Sections outside these three never contribute.
    pub fn for_stage(
        store: &ConfigStore,
        analysis: &SectionPath,
        stage: &str,
        defaults: &JobResources,
    ) -> ConfigResult<Self> {
        let root = SectionPath::new([analysis.segments()[0].as_str()])?;
        let paths = [
            Self::drms_section(&root, None)?,
            Self::drms_section(analysis, None)?,
            Self::drms_section(analysis, Some(stage))?,
        ];

        tracing::debug!(%analysis, stage, "resolving job resources");
        Self::resolve_layered(store, &paths, defaults)
    }
}

/// Typed reads of a single scheduler section
struct DrmsValues<'a> {
    section: &'a Section,
}

impl DrmsValues<'_> {
    fn text(&self, option: &str) -> Option<String> {
        self.section.get(option).map(str::to_string)
    }

    fn typed<T>(
        &self,
        option: &str,
        parse: impl FnOnce(&str) -> Result<T, String>,
        error: impl FnOnce(String, String, String) -> BsfError,
    ) -> ConfigResult<Option<T>> {
        match self.section.get(option) {
            Some(raw) => parse(raw)
                .map(Some)
                .map_err(|reason| error(self.section.path.to_string(), raw.to_string(), reason)),
            None => Ok(None),
        }
    }

    fn size(&self, option: &str) -> ConfigResult<Option<u64>> {
        self.typed(option, parse_size, |section, value, reason| BsfError::InvalidUnit {
            section,
            option: option.to_string(),
            value,
            reason,
        })
    }

    fn duration(&self, option: &str) -> ConfigResult<Option<u64>> {
        self.typed(option, parse_duration, |section, value, reason| BsfError::InvalidDuration {
            section,
            option: option.to_string(),
            value,
            reason,
        })
    }

    fn threads(&self, option: &str) -> ConfigResult<Option<i64>> {
        self.typed(
            option,
            |raw| parse_int(raw, 1),
            |section, value, reason| BsfError::InvalidInteger {
                section,
                option: option.to_string(),
                value,
                reason,
            },
        )
    }

    fn boolean(&self, option: &str) -> ConfigResult<Option<bool>> {
        self.typed(
            option,
            |raw| parse_bool(raw).ok_or_else(String::new),
            |section, value, _| BsfError::InvalidBoolean {
                section,
                option: option.to_string(),
                value,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[bsf.DRMS]
implementation = slurm
memory_hard = 4G
time_limit = 12:00:00
queue = shortq

[bsf.analyses.bwa.BWA]
e_mail = ngs@example.org

[bsf.analyses.bwa.BWA.DRMS]
threads = 4

[bsf.analyses.bwa.BWA.DRMS.align]
memory_hard = 32G
time_limit = 2-00:00:00
queue = longq
is_script = true
"#;

    fn analysis() -> SectionPath {
        SectionPath::parse("bsf.analyses.bwa.BWA").unwrap()
    }

    #[test]
    fn test_drms_section() {
        assert_eq!(
            JobResources::drms_section(&analysis(), Some("align")).unwrap().to_string(),
            "bsf.analyses.bwa.BWA.DRMS.align"
        );
        assert_eq!(
            JobResources::drms_section(&analysis(), None).unwrap().to_string(),
            "bsf.analyses.bwa.BWA.DRMS"
        );
        assert!(JobResources::drms_section(&analysis(), Some("bad stage")).is_err());
    }

    #[test]
    fn test_for_stage_layers_generic_defaults() {
        let store = ConfigStore::load_str(CONFIG).unwrap();
        let resources =
            JobResources::for_stage(&store, &analysis(), "align", &JobResources::default()).unwrap();

        assert_eq!(resources.implementation.as_deref(), Some("slurm"));
        assert_eq!(resources.memory_hard, Some(32 * 1024u64.pow(3)));
        assert_eq!(resources.time_limit, Some(172800));
        assert_eq!(resources.threads, Some(4));
        assert_eq!(resources.queue.as_deref(), Some("longq"));
        assert_eq!(resources.is_script, Some(true));
        assert_eq!(resources.memory_soft, None);
    }

    #[test]
    fn test_stage_without_section_uses_analysis_drms() {
        let store = ConfigStore::load_str(CONFIG).unwrap();
        let resources =
            JobResources::for_stage(&store, &analysis(), "sort", &JobResources::default()).unwrap();

        assert_eq!(resources.threads, Some(4));
        assert_eq!(resources.memory_hard, Some(4 * 1024u64.pow(3)));
        assert_eq!(resources.time_limit, Some(43200));
        assert_eq!(resources.queue.as_deref(), Some("shortq"));
    }

    #[test]
    fn test_caller_defaults_fill_gaps() {
        let store = ConfigStore::load_str(CONFIG).unwrap();
        let defaults = JobResources {
            memory_soft: Some(1024),
            parallel_environment: Some("smp".to_string()),
            queue: Some("ignored".to_string()),
            ..JobResources::default()
        };

        let resources = JobResources::for_stage(&store, &analysis(), "align", &defaults).unwrap();
        assert_eq!(resources.memory_soft, Some(1024));
        assert_eq!(resources.parallel_environment.as_deref(), Some("smp"));
        assert_eq!(resources.queue.as_deref(), Some("longq"));
    }

    #[test]
    fn test_invalid_value_is_reported() {
        let store = ConfigStore::load_str("[bsf.DRMS]\nthreads = 0\n").unwrap();
        let err = JobResources::for_stage(
            &store,
            &SectionPath::parse("bsf.Analysis").unwrap(),
            "run",
            &JobResources::default(),
        )
        .unwrap_err();
        assert!(matches!(err, BsfError::InvalidInteger { .. }));
    }

    #[test]
    fn test_only_drms_sections_contribute() {
        let store = ConfigStore::load_str(
            "[bsf]\nqueue = interactive\nthreads = 1\n\
             [bsf.DRMS]\nqueue = shortq\nthreads = 4\n\
             [bsf.analyses.bwa.BWA]\nmemory_hard = 1K\n",
        )
        .unwrap();

        let resources =
            JobResources::for_stage(&store, &analysis(), "align", &JobResources::default()).unwrap();
        assert_eq!(resources.queue.as_deref(), Some("shortq"));
        assert_eq!(resources.threads, Some(4));
        assert_eq!(resources.memory_hard, None);
    }

    #[test]
    fn test_invalid_value_names_its_section() {
        let store = ConfigStore::load_str(
            "[bsf.DRMS]\ntime_limit = 12:00:00\n[bsf.analyses.bwa.BWA.DRMS.align]\ntime_limit = 1:75:00\n",
        )
        .unwrap();

        match JobResources::for_stage(&store, &analysis(), "align", &JobResources::default()) {
            Err(BsfError::InvalidDuration { section, value, .. }) => {
                assert_eq!(section, "bsf.analyses.bwa.BWA.DRMS.align");
                assert_eq!(value, "1:75:00");
            },
            other => panic!("expected an invalid duration, got {:?}", other),
        }
    }

    #[test]
    fn test_serializes_to_json() {
        let resources = JobResources {
            threads: Some(8),
            ..JobResources::default()
        };
        let json = serde_json::to_value(&resources).unwrap();
        assert_eq!(json["threads"], 8);
        assert!(json["queue"].is_null());
    }
}
