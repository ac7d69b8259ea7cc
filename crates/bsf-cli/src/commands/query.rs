//! Single option queries.

use std::path::Path;

use bsf_core::error::BsfResult;

use super::CommandContext;
use crate::OptionQuery;

/// Raw value as written in the configuration
pub fn get(query: &OptionQuery, ctx: &CommandContext) -> BsfResult<Option<String>> {
    let section = query.section_path()?;
    let resolved = ctx
        .store
        .resolver()
        .resolve(&section, &query.option, query.fallback.as_deref());

    if let Some(origin) = resolved.origin() {
        tracing::debug!(%origin, option = %query.option, "option found");
    }
    Ok(resolved.into_option())
}

/// Expanded path, relative values joined onto `root`
pub fn path(query: &OptionQuery, root: Option<&Path>, ctx: &CommandContext) -> BsfResult<Option<String>> {
    let section = query.section_path()?;
    let path = ctx.store.resolver().resolve_path(
        &section,
        &query.option,
        query.fallback.as_deref(),
        &ctx.normalizer,
        root,
    )?;

    Ok(path.map(|path| path.display().to_string()))
}

/// Size in bytes
pub fn size(query: &OptionQuery, ctx: &CommandContext) -> BsfResult<Option<String>> {
    let section = query.section_path()?;
    let bytes = ctx
        .store
        .limits()
        .resolve_size(&section, &query.option, query.fallback.as_deref())?;

    Ok(bytes.map(|bytes| bytes.to_string()))
}

/// Duration in seconds
pub fn duration(query: &OptionQuery, ctx: &CommandContext) -> BsfResult<Option<String>> {
    let section = query.section_path()?;
    let seconds = ctx
        .store
        .limits()
        .resolve_duration(&section, &query.option, query.fallback.as_deref())?;

    Ok(seconds.map(|seconds| seconds.to_string()))
}

pub fn int(query: &OptionQuery, minimum: i64, ctx: &CommandContext) -> BsfResult<Option<String>> {
    let section = query.section_path()?;
    let value = ctx
        .store
        .limits()
        .resolve_int(&section, &query.option, query.fallback.as_deref(), minimum)?;

    Ok(value.map(|value| value.to_string()))
}

pub fn boolean(query: &OptionQuery, ctx: &CommandContext) -> BsfResult<Option<String>> {
    let section = query.section_path()?;
    let value = ctx
        .store
        .resolver()
        .resolve_bool(&section, &query.option, query.fallback.as_deref())?;

    Ok(value.map(|value| value.to_string()))
}
