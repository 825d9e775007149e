//! Application configuration management

use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::document::DocumentType;

/// Storage root used when nothing else is configured
pub const DEFAULT_STORAGE_ROOT: &str = "data";

const MAX_RECENT_ROOTS: usize = 10;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base directory holding the canonical type subdirectories
    pub storage_root: PathBuf,
    /// Canonical subdirectory per document type
    pub type_directories: TypeDirectories,
    /// Recently used storage roots, most recent first
    pub recent_roots: Vec<PathBuf>,
}

/// Canonical subdirectory for each recognized document type, relative to the
/// storage root.
///
/// Fixed once constructed; the catalog relies on the three-way split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeDirectories {
    pdf: PathBuf,
    epub: PathBuf,
    txt: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from(DEFAULT_STORAGE_ROOT),
            type_directories: TypeDirectories::default(),
            recent_roots: Vec::new(),
        }
    }
}

impl Default for TypeDirectories {
    fn default() -> Self {
        Self {
            pdf: PathBuf::from("articles/pdf"),
            epub: PathBuf::from("books/epub"),
            txt: PathBuf::from("documents/txt"),
        }
    }
}

impl TypeDirectories {
    #[allow(dead_code)]
    pub fn new(pdf: impl Into<PathBuf>, epub: impl Into<PathBuf>, txt: impl Into<PathBuf>) -> Self {
        Self {
            pdf: pdf.into(),
            epub: epub.into(),
            txt: txt.into(),
        }
    }

    /// Canonical subdirectory for a document type
    pub fn get(&self, doc_type: DocumentType) -> &Path {
        match doc_type {
            DocumentType::Pdf => &self.pdf,
            DocumentType::Epub => &self.epub,
            DocumentType::Txt => &self.txt,
        }
    }

    /// All (type, subdirectory) pairs in walk order
    pub fn iter(&self) -> impl Iterator<Item = (DocumentType, &Path)> + '_ {
        DocumentType::ALL.into_iter().map(move |ty| (ty, self.get(ty)))
    }

    /// Reject subdirectories that would escape the storage root
    pub fn validate(&self) -> Result<()> {
        for (doc_type, dir) in self.iter() {
            let escapes = dir.as_os_str().is_empty()
                || dir
                    .components()
                    .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
            if escapes {
                bail!(
                    "Directory for {} documents must be a relative path inside the storage root: {}",
                    doc_type,
                    dir.display()
                );
            }
        }
        Ok(())
    }
}

impl AppConfig {
    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "docshelf", "Docshelf")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from `path`, falling back to defaults if it is absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.type_directories.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Load the configuration at `path` and switch to `root` when one is given.
    ///
    /// An unreadable file gives the defaults. The new root is only written
    /// back when the file loaded cleanly, so a broken config is never
    /// replaced by defaults.
    pub fn load_with_root(path: &Path, root: Option<PathBuf>) -> Self {
        let (mut config, loaded) = match Self::load_from(path) {
            Ok(config) => (config, true),
            Err(e) => {
                tracing::warn!("Using default configuration: {:#}", e);
                (Self::default(), false)
            }
        };

        if let Some(root) = root {
            config.use_storage_root(root);
            if !loaded {
                tracing::warn!("Not remembering storage root in {}", path.display());
            } else if let Err(e) = config.save_to(path) {
                tracing::warn!("Could not remember storage root: {:#}", e);
            }
        }
        config
    }

    /// Make `path` the storage root and remember it as the most recent one
    pub fn use_storage_root(&mut self, path: PathBuf) {
        self.recent_roots.retain(|p| p != &path);
        self.recent_roots.insert(0, path.clone());
        self.recent_roots.truncate(MAX_RECENT_ROOTS);
        self.storage_root = path;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.storage_root, PathBuf::from("data"));
        let dirs = &config.type_directories;
        assert_eq!(dirs.get(DocumentType::Pdf), Path::new("articles/pdf"));
        assert_eq!(dirs.get(DocumentType::Epub), Path::new("books/epub"));
        assert_eq!(dirs.get(DocumentType::Txt), Path::new("documents/txt"));
        assert!(dirs.validate().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = AppConfig::load_from(&temp_dir.path().join("absent.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.use_storage_root(PathBuf::from("/srv/library"));
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.storage_root, PathBuf::from("/srv/library"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "type_directories": { "pdf": "papers" } }"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.storage_root, PathBuf::from("data"));
        assert_eq!(config.type_directories.get(DocumentType::Pdf), Path::new("papers"));
        assert_eq!(config.type_directories.get(DocumentType::Txt), Path::new("documents/txt"));
    }

    #[test]
    fn test_root_override_is_remembered() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "type_directories": { "pdf": "papers" } }"#).unwrap();

        let config = AppConfig::load_with_root(&path, Some(PathBuf::from("/srv/other")));
        assert_eq!(config.storage_root, PathBuf::from("/srv/other"));

        let saved = AppConfig::load_from(&path).unwrap();
        assert_eq!(saved.storage_root, PathBuf::from("/srv/other"));
        assert_eq!(saved.type_directories.get(DocumentType::Pdf), Path::new("papers"));
    }

    #[test]
    fn test_broken_config_not_overwritten_by_root_override() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        let broken = r#"{"storage_root":"/srv/lib","type_directories":{"pdf":"papers"},"recent_roots":["/srv/lib"],}"#;
        std::fs::write(&path, broken).unwrap();

        let config = AppConfig::load_with_root(&path, Some(PathBuf::from("/tmp/x")));
        assert_eq!(config.storage_root, PathBuf::from("/tmp/x"));
        assert_eq!(config.type_directories, TypeDirectories::default());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), broken);
    }

    #[test]
    fn test_missing_config_created_by_root_override() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("docshelf").join("config.json");

        let config = AppConfig::load_with_root(&path, Some(PathBuf::from("library")));
        assert_eq!(config.recent_roots, vec![PathBuf::from("library")]);
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);

        let config = AppConfig::load_with_root(&temp_dir.path().join("absent.json"), None);
        assert_eq!(config, AppConfig::default());
        assert!(!temp_dir.path().join("absent.json").exists());
    }

    #[test]
    fn test_escaping_type_directory_rejected() {
        let dirs = TypeDirectories::new("../outside", "books/epub", "documents/txt");
        assert!(dirs.validate().is_err());
        let dirs = TypeDirectories::new("/abs/pdf", "books/epub", "documents/txt");
        assert!(dirs.validate().is_err());
    }

    #[test]
    fn test_recent_roots() {
        let mut config = AppConfig::default();
        for i in 0..12 {
            config.use_storage_root(PathBuf::from(format!("root{}", i)));
        }
        config.use_storage_root(PathBuf::from("root5"));

        assert_eq!(config.recent_roots.len(), 10);
        assert_eq!(config.recent_roots[0], PathBuf::from("root5"));
        assert_eq!(config.storage_root, PathBuf::from("root5"));
        assert_eq!(config.recent_roots.iter().filter(|p| *p == Path::new("root5")).count(), 1);
    }
}
