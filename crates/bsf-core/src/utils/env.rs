//! Environment providers for path expansion.
//!
//! Variable lookup and home directory discovery are behind the
//! `Environment` trait so callers can snapshot or fake the process
//! environment.

use std::collections::HashMap;
use std::path::PathBuf;

/// Source of environment variables and home directories
pub trait Environment: Send + Sync {
    /// Value of an environment variable
    fn var(&self, name: &str) -> Option<String>;

    /// Home directory of the invoking user
    fn home_dir(&self) -> Option<PathBuf>;

    /// Home directory of a named user
    fn user_home_dir(&self, user: &str) -> Option<PathBuf>;
}

impl<E: Environment + ?Sized> Environment for Box<E> {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }

    fn home_dir(&self) -> Option<PathBuf> {
        (**self).home_dir()
    }

    fn user_home_dir(&self, user: &str) -> Option<PathBuf> {
        (**self).user_home_dir(user)
    }
}

/// The real process environment
#[derive(Debug, Clone)]
pub struct SystemEnvironment {
    passwd_path: PathBuf,
}

impl SystemEnvironment {
    pub fn new() -> Self {
        Self {
            passwd_path: PathBuf::from("/etc/passwd"),
        }
    }

    /// Use a different passwd database for `~user` lookups
    pub fn with_passwd_file(passwd_path: impl Into<PathBuf>) -> Self {
        Self {
            passwd_path: passwd_path.into(),
        }
    }
}

impl Default for SystemEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for SystemEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn user_home_dir(&self, user: &str) -> Option<PathBuf> {
        if self.var("USER").as_deref() == Some(user) {
            if let Some(home) = self.home_dir() {
                return Some(home);
            }
        }

        let content = std::fs::read_to_string(&self.passwd_path).ok()?;
        passwd_home(&content, user)
    }
}

/// Find a user's home directory in passwd(5) formatted content
pub fn passwd_home(content: &str, user: &str) -> Option<PathBuf> {
    content
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(|line| line.split(':').collect::<Vec<_>>())
        .find(|fields| fields.len() >= 6 && fields[0] == user)
        .map(|fields| PathBuf::from(fields[5]))
        .filter(|home| !home.as_os_str().is_empty())
}

/// A fixed environment
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
    home: Option<PathBuf>,
    users: HashMap<String, PathBuf>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn with_user_home(mut self, user: impl Into<String>, home: impl Into<PathBuf>) -> Self {
        self.users.insert(user.into(), home.into());
        self
    }
}

impl Environment for MapEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home.clone()
    }

    fn user_home_dir(&self, user: &str) -> Option<PathBuf> {
        self.users.get(user).cloned()
    }
}
