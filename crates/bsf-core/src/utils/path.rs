//! Path utilities for path-valued configuration options.
//!
//! Provides home and variable expansion followed by root prepending, plus a
//! lexical cleanup of `.` and `..` components.

use crate::error::{BsfError, BsfResult};
use crate::utils::env::{Environment, SystemEnvironment};
use std::path::{Component, Path, PathBuf};

/// Normalize a path by resolving . and .. components
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {
                // Skip current directory
            },
            Component::ParentDir => {
                match components.last() {
                    Some(Component::Normal(_)) => {
                        components.pop();
                    },
                    // `/..` is `/`
                    Some(Component::RootDir) | Some(Component::Prefix(_)) => {},
                    _ => components.push(component),
                }
            },
            other => {
                components.push(other);
            },
        }
    }

    components.iter().collect()
}

/// Expands and roots path-valued option values
///
/// Steps run in a fixed order, each on the previous output:
/// 1. a leading `~` or `~user` becomes the home directory
/// 2. `$VAR` and `${VAR}` are replaced from the environment, unknown ones stay as written
/// 3. a still relative path is joined onto the default root, if one is given
#[derive(Debug, Clone)]
pub struct PathNormalizer<E = SystemEnvironment> {
    env: E,
    lexical_cleanup: bool,
}

impl PathNormalizer<SystemEnvironment> {
    /// Normalizer over the real process environment
    pub fn system() -> Self {
        Self::new(SystemEnvironment::new())
    }
}

impl Default for PathNormalizer<SystemEnvironment> {
    fn default() -> Self {
        Self::system()
    }
}

impl<E: Environment> PathNormalizer<E> {
    pub fn new(env: E) -> Self {
        Self {
            env,
            lexical_cleanup: false,
        }
    }

    /// Also resolve `.` and `..` components after rooting
    pub fn normalize_lexically(mut self, enabled: bool) -> Self {
        self.lexical_cleanup = enabled;
        self
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Expand `raw` and prepend `default_root` if the result is relative
    ///
    /// Fails only when a leading `~` asks for a home directory that cannot
    /// be determined.
    pub fn normalize(&self, raw: &str, default_root: Option<&Path>) -> BsfResult<PathBuf> {
        let expanded = self.expand_user(raw)?;
        let expanded = self.expand_vars(&expanded);

        let path = PathBuf::from(&expanded);
        let rooted = match default_root {
            Some(root) if !path.is_absolute() => root.join(path),
            _ => path,
        };

        tracing::trace!(raw, result = %rooted.display(), "normalized path");

        if self.lexical_cleanup {
            Ok(normalize_path(&rooted))
        } else {
            Ok(rooted)
        }
    }

    /// Replace a leading `~` or `~user` with the home directory
    pub fn expand_user(&self, raw: &str) -> BsfResult<String> {
        let Some(tail) = raw.strip_prefix('~') else {
            return Ok(raw.to_string());
        };

        let split = tail.find('/').unwrap_or(tail.len());
        let (user, rest) = tail.split_at(split);

        let home = if user.is_empty() {
            self.env.home_dir().ok_or_else(|| BsfError::InvalidPath {
                path: raw.to_string(),
                reason: "could not determine the home directory".to_string(),
            })?
        } else {
            self.env
                .user_home_dir(user)
                .ok_or_else(|| BsfError::InvalidPath {
                    path: raw.to_string(),
                    reason: format!("could not determine the home directory of user '{}'", user),
                })?
        };

        let home = home.to_string_lossy();
        let trimmed = home.trim_end_matches('/');
        if trimmed.is_empty() && rest.is_empty() {
            // Home is the filesystem root
            return Ok("/".to_string());
        }

        Ok(format!("{}{}", trimmed, rest))
    }

    /// Replace `$VAR` and `${VAR}` references, leaving unknown ones verbatim
    pub fn expand_vars(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(braced) = after.strip_prefix('{') {
                match braced.find('}') {
                    Some(end) => {
                        let name = &braced[..end];
                        match self.lookup(name) {
                            Some(value) => out.push_str(&value),
                            // `${` + name + `}`
                            None => out.push_str(&rest[pos..pos + end + 3]),
                        }
                        rest = &braced[end + 1..];
                    },
                    None => {
                        out.push_str(&rest[pos..]);
                        rest = "";
                    },
                }
                continue;
            }

            let len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            if len == 0 {
                out.push('$');
                rest = after;
                continue;
            }

            let name = &after[..len];
            match self.lookup(name) {
                Some(value) => out.push_str(&value),
                None => {
                    out.push('$');
                    out.push_str(name);
                },
            }
            rest = &after[len..];
        }

        out.push_str(rest);
        out
    }

    fn lookup(&self, name: &str) -> Option<String> {
        if name.is_empty() {
            return None;
        }
        self.env.var(name)
    }
}
