//! Whole-section and whole-store views.

use std::io;

use bsf_config::JobResources;
use bsf_core::error::{BsfError, BsfResult};
use bsf_core::{ResolvedValue, SectionPath};

use super::CommandContext;

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> BsfResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| BsfError::io("Failed to serialize output".to_string(), io::Error::new(io::ErrorKind::Other, e)))
}

/// Declared sections, one per line, in declaration order
pub fn sections(ctx: &CommandContext) -> String {
    ctx.store
        .section_paths()
        .map(SectionPath::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Options visible from `section`, annotated with the section that sets them
pub fn show(section: &str, json: bool, ctx: &CommandContext) -> BsfResult<String> {
    let path = SectionPath::parse(section)?;
    let options = ctx.store.resolver().effective_options(&path);

    if json {
        return to_json(&options);
    }

    let mut lines = vec![format!("[{}]", path)];
    for (option, resolved) in &options {
        if let ResolvedValue::Found { value, origin } = resolved {
            // Origin on its own line, inline `#` text is part of a value
            if origin != &path {
                lines.push(format!("# from {}", origin));
            }
            lines.push(format!("{} = {}", option, value));
        }
    }

    Ok(lines.join("\n"))
}

/// Job resources of one analysis stage as JSON
pub fn resources(analysis: &str, stage: &str, ctx: &CommandContext) -> BsfResult<String> {
    let analysis = SectionPath::parse(analysis)?;
    let resources = JobResources::for_stage(&ctx.store, &analysis, stage, &JobResources::default())?;
    to_json(&resources)
}
