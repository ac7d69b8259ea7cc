//! Configuration file loading
//!
//! Reads configuration files into `Document`s and merges them into a
//! `ConfigStore`. File names go through the same home and variable
//! expansion as path-valued options.

use camino::{Utf8Path, Utf8PathBuf};

use bsf_core::{BsfError, Environment, PathNormalizer, SystemEnvironment};

use crate::ini::Document;
use crate::store::ConfigStore;
use crate::ConfigResult;

/// Environment variable listing site configuration files, colon separated
pub const CONFIG_PATH_VAR: &str = "BSF_CONFIG";

/// Per-user configuration file, loaded after the site files
pub const USER_CONFIG_FILE: &str = "~/.bsfpython.ini";

/// Main configuration loading interface
#[derive(Debug, Clone)]
pub struct ConfigLoader<E = SystemEnvironment> {
    normalizer: PathNormalizer<E>,
}

impl ConfigLoader<SystemEnvironment> {
    /// Loader over the real process environment
    pub fn new() -> Self {
        Self {
            normalizer: PathNormalizer::system(),
        }
    }
}

impl Default for ConfigLoader<SystemEnvironment> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Environment> ConfigLoader<E> {
    /// Loader expanding file names with a custom normalizer
    pub fn with_normalizer(normalizer: PathNormalizer<E>) -> Self {
        Self { normalizer }
    }

    /// Expand `~` and variables in a configuration file name
    pub fn resolve_config_path(&self, raw: &str) -> ConfigResult<Utf8PathBuf> {
        let path = self.normalizer.normalize(raw, None)?;
        Utf8PathBuf::from_path_buf(path).map_err(|path| BsfError::InvalidPath {
            path: path.display().to_string(),
            reason: "configuration file path is not valid UTF-8".to_string(),
        })
    }

    /// Read one file into a document named after its path
    pub async fn read_document(&self, path: &Utf8Path) -> ConfigResult<Document> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| BsfError::io(format!("Failed to read {}", path), e))?;

        Ok(Document::new(path.as_str(), text))
    }

    /// Load every file in order, a missing file is an error
    pub async fn load_files<I, S>(&self, paths: I) -> ConfigResult<ConfigStore>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut documents = Vec::new();

        for raw in paths {
            let path = self.resolve_config_path(raw.as_ref())?;
            tracing::debug!(%path, "loading configuration file");
            documents.push(self.read_document(&path).await?);
        }

        ConfigStore::load(&documents)
    }

    /// Load the files that exist, skipping missing optional layers
    pub async fn load_layers<I, S>(&self, paths: I) -> ConfigResult<ConfigStore>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut documents = Vec::new();

        for raw in paths {
            let path = match self.resolve_config_path(raw.as_ref()) {
                Ok(path) => path,
                Err(BsfError::InvalidPath { path, reason }) => {
                    tracing::debug!(%path, %reason, "configuration layer cannot be located, skipping");
                    continue;
                },
                Err(e) => return Err(e),
            };

            let exists = tokio::fs::try_exists(&path)
                .await
                .map_err(|e| BsfError::io(format!("Failed to check {}", path), e))?;
            if !exists {
                tracing::debug!(%path, "no configuration layer found, skipping");
                continue;
            }

            tracing::debug!(%path, "loading configuration layer");
            documents.push(self.read_document(&path).await?);
        }

        ConfigStore::load(&documents)
    }

    /// Site files from `BSF_CONFIG` followed by the per-user file
    pub fn default_layers(&self) -> Vec<String> {
        let mut layers: Vec<String> = self
            .normalizer
            .environment()
            .var(CONFIG_PATH_VAR)
            .map(|value| {
                value
                    .split(':')
                    .map(str::trim)
                    .filter(|entry| !entry.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        layers.push(USER_CONFIG_FILE.to_string());
        layers
    }

    /// Load the default layers, skipping missing ones
    pub async fn load_default(&self) -> ConfigResult<ConfigStore> {
        let layers = self.default_layers();
        self.load_layers(&layers).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsf_core::{MapEnvironment, SectionPath};
    use tempfile::TempDir;

    fn temp_path(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap()
    }

    fn loader_for(dir: &Utf8Path) -> ConfigLoader<MapEnvironment> {
        ConfigLoader::with_normalizer(PathNormalizer::new(
            MapEnvironment::new()
                .with_home(dir.as_std_path())
                .with_var("SITE", dir.as_str()),
        ))
    }

    #[tokio::test]
    async fn test_load_files_in_order() {
        let dir = TempDir::new().unwrap();
        let root = temp_path(&dir);
        tokio::fs::write(root.join("site.ini"), "[bsf.DRMS]\nqueue = shortq\nthreads = 2\n")
            .await
            .unwrap();
        tokio::fs::write(root.join("project.ini"), "[bsf.DRMS]\nqueue = longq\n")
            .await
            .unwrap();

        let loader = loader_for(&root);
        let store = loader
            .load_files(["$SITE/site.ini", "~/project.ini"])
            .await
            .unwrap();

        let section = store
            .get_section(&SectionPath::parse("bsf.DRMS").unwrap())
            .unwrap();
        assert_eq!(section.get("queue"), Some("longq"));
        assert_eq!(section.get("threads"), Some("2"));
        assert_eq!(store.source_names().len(), 2);
        assert!(store.source_names()[0].ends_with("site.ini"));
    }

    #[tokio::test]
    async fn test_load_files_missing_is_error() {
        let dir = TempDir::new().unwrap();
        let root = temp_path(&dir);

        let err = loader_for(&root)
            .load_files(["~/missing.ini"])
            .await
            .unwrap_err();
        assert!(matches!(err, BsfError::Io { .. }));
    }

    #[tokio::test]
    async fn test_load_layers_skips_missing() {
        let dir = TempDir::new().unwrap();
        let root = temp_path(&dir);
        tokio::fs::write(root.join("site.ini"), "[a]\nx = 1\n").await.unwrap();

        let store = loader_for(&root)
            .load_layers(["$SITE/site.ini", "~/missing.ini"])
            .await
            .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.source_names().len(), 1);
    }

    #[tokio::test]
    async fn test_load_layers_reports_unreadable_location() {
        let dir = TempDir::new().unwrap();
        let root = temp_path(&dir);
        tokio::fs::write(root.join("site.ini"), "[a]\nx = 1\n").await.unwrap();

        // A regular file used as a directory is an error, not a missing layer
        let err = loader_for(&root)
            .load_layers(["$SITE/site.ini/user.ini"])
            .await
            .unwrap_err();
        assert!(matches!(err, BsfError::Io { .. }));
    }

    #[tokio::test]
    async fn test_load_layers_skips_unlocatable_home() {
        let loader = ConfigLoader::with_normalizer(PathNormalizer::new(MapEnvironment::new()));
        let store = loader.load_layers([USER_CONFIG_FILE]).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        let root = temp_path(&dir);
        tokio::fs::write(root.join("broken.ini"), "[a\n").await.unwrap();

        let err = loader_for(&root)
            .load_files(["~/broken.ini"])
            .await
            .unwrap_err();
        match err {
            BsfError::Parse { source_name, line, .. } => {
                assert!(source_name.ends_with("broken.ini"));
                assert_eq!(line, 1);
            },
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_default_layers() {
        let loader = ConfigLoader::with_normalizer(PathNormalizer::new(
            MapEnvironment::new().with_var(CONFIG_PATH_VAR, "/etc/bsf/site.ini::/opt/bsf/extra.ini"),
        ));
        assert_eq!(
            loader.default_layers(),
            vec![
                "/etc/bsf/site.ini".to_string(),
                "/opt/bsf/extra.ini".to_string(),
                USER_CONFIG_FILE.to_string(),
            ]
        );

        let bare = ConfigLoader::with_normalizer(PathNormalizer::new(MapEnvironment::new()));
        assert_eq!(bare.default_layers(), vec![USER_CONFIG_FILE.to_string()]);
    }

    #[test]
    fn test_load_default_blocking() {
        let dir = TempDir::new().unwrap();
        let root = temp_path(&dir);
        std::fs::write(root.join(".bsfpython.ini"), "[bsf]\ndebug = 2\n").unwrap();

        let store = tokio_test::block_on(loader_for(&root).load_default()).unwrap();
        assert_eq!(
            store.resolver().get(&SectionPath::parse("bsf.Analysis").unwrap(), "debug"),
            Some("2")
        );
    }
}
