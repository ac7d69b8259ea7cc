//! Typed resource limit options
//!
//! Memory sizes (`6G`, `512M`), time limits (`06:00:00`, `2-00:00:00`) and
//! thread counts are resolved through the `SectionResolver` first, so the
//! parsing below never depends on where in the hierarchy a value was found.

use bsf_core::{BsfError, ResolvedValue, SectionPath};

use crate::resolver::SectionResolver;
use crate::ConfigResult;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

/// Parse a size with an optional K, M, G or T suffix into bytes
///
/// Suffixes are case-insensitive powers of 1024.
pub fn parse_size(raw: &str) -> Result<u64, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("empty value".to_string());
    }

    let (magnitude, factor) = match raw.char_indices().last() {
        Some((index, c)) if c.is_ascii_alphabetic() => {
            let exponent = match c.to_ascii_uppercase() {
                'K' => 1,
                'M' => 2,
                'G' => 3,
                'T' => 4,
                other => return Err(format!("unknown unit suffix '{}'", other)),
            };
            (&raw[..index], 1024u64.pow(exponent))
        },
        _ => (raw, 1),
    };

    if magnitude.is_empty() || !magnitude.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("magnitude '{}' is not a whole number", magnitude));
    }

    let magnitude: u64 = magnitude
        .parse()
        .map_err(|_| format!("magnitude '{}' is out of range", magnitude))?;

    magnitude
        .checked_mul(factor)
        .ok_or_else(|| "size does not fit in 64 bits".to_string())
}

/// Parse `HH:MM:SS` or `D-HH:MM:SS` into seconds
///
/// Minutes and seconds must lie within 0 to 59, hours are not bounded.
pub fn parse_duration(raw: &str) -> Result<u64, String> {
    let raw = raw.trim();

    let (days, clock) = match raw.split_once('-') {
        Some((days, clock)) => (Some(days), clock),
        None => (None, raw),
    };

    let days = match days {
        Some(days) => parse_component(days, "days")?,
        None => 0,
    };

    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("expected HH:MM:SS, found '{}'", clock));
    }

    let hours = parse_component(parts[0], "hours")?;
    let minutes = parse_component(parts[1], "minutes")?;
    let seconds = parse_component(parts[2], "seconds")?;

    if minutes > 59 {
        return Err(format!("minutes {} out of range 0-59", minutes));
    }
    if seconds > 59 {
        return Err(format!("seconds {} out of range 0-59", seconds));
    }

    days.checked_mul(SECONDS_PER_DAY)
        .and_then(|total| total.checked_add(hours.checked_mul(SECONDS_PER_HOUR)?))
        .and_then(|total| total.checked_add(minutes * SECONDS_PER_MINUTE + seconds))
        .ok_or_else(|| "duration does not fit in 64 bits".to_string())
}

fn parse_component(component: &str, name: &str) -> Result<u64, String> {
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("{} component '{}' is not a number", name, component));
    }

    component
        .parse()
        .map_err(|_| format!("{} component '{}' is out of range", name, component))
}

/// Parse a plain integer that must be at least `minimum`
pub fn parse_int(raw: &str, minimum: i64) -> Result<i64, String> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| "not a whole number".to_string())?;

    if value < minimum {
        return Err(format!("must be at least {}", minimum));
    }

    Ok(value)
}

/// Parse the INI boolean vocabulary
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

/// Size, duration and integer lookups layered on `SectionResolver`
///
/// A value that is neither defined nor given as fallback yields `Ok(None)`.
/// A fallback is parsed exactly like a configured value.
#[derive(Debug, Clone, Copy)]
pub struct ResourceLimitResolver<'a> {
    resolver: SectionResolver<'a>,
}

impl<'a> ResourceLimitResolver<'a> {
    pub fn new(resolver: SectionResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Memory size in bytes
    pub fn resolve_size(
        &self,
        path: &SectionPath,
        option: &str,
        fallback: Option<&str>,
    ) -> ConfigResult<Option<u64>> {
        self.typed(path, option, fallback, parse_size, |section, value, reason| {
            BsfError::InvalidUnit {
                section,
                option: option.to_string(),
                value,
                reason,
            }
        })
    }

    /// Time limit in seconds
    pub fn resolve_duration(
        &self,
        path: &SectionPath,
        option: &str,
        fallback: Option<&str>,
    ) -> ConfigResult<Option<u64>> {
        self.typed(path, option, fallback, parse_duration, |section, value, reason| {
            BsfError::InvalidDuration {
                section,
                option: option.to_string(),
                value,
                reason,
            }
        })
    }

    /// Integer no smaller than `minimum`
    pub fn resolve_int(
        &self,
        path: &SectionPath,
        option: &str,
        fallback: Option<&str>,
        minimum: i64,
    ) -> ConfigResult<Option<i64>> {
        self.typed(
            path,
            option,
            fallback,
            |raw| parse_int(raw, minimum),
            |section, value, reason| BsfError::InvalidInteger {
                section,
                option: option.to_string(),
                value,
                reason,
            },
        )
    }

    /// Thread count, at least 1
    pub fn resolve_threads(
        &self,
        path: &SectionPath,
        option: &str,
        fallback: Option<&str>,
    ) -> ConfigResult<Option<i64>> {
        self.resolve_int(path, option, fallback, 1)
    }

    fn typed<T>(
        &self,
        path: &SectionPath,
        option: &str,
        fallback: Option<&str>,
        parse: impl FnOnce(&str) -> Result<T, String>,
        error: impl FnOnce(String, String, String) -> BsfError,
    ) -> ConfigResult<Option<T>> {
        let resolved = self.resolver.resolve(path, option, fallback);
        let raw = match &resolved {
            ResolvedValue::Found { value, .. } | ResolvedValue::Fallback { value } => value,
            ResolvedValue::Absent => return Ok(None),
        };

        parse(raw.as_str()).map(Some).map_err(|reason| {
            // Report the section holding the bad value, or the queried one for a fallback
            let section = resolved.origin().unwrap_or(path).to_string();
            error(section, raw.clone(), reason)
        })
    }
}
