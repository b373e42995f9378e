//! Template registry - query templates keyed by test-case type.
//!
//! One template per file; the file name is the type key. Templates are plain
//! text holding the `<GOAL>`, `<EXPECTED>` and `<WRITEVAR>` placeholders and
//! are immutable once loaded. Placeholder checks happen at synthesis time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("template directory does not exist: {}", path.display())]
    MissingDirectory { path: PathBuf },

    #[error("failed to read template {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Immutable lookup of query templates by test-case type.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, String>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every regular file in `dir` as a template keyed by its file name.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> RegistryResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(RegistryError::MissingDirectory {
                path: dir.to_path_buf(),
            });
        }

        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| RegistryError::Io { path, source }
        };

        let mut registry = Self::new();
        for entry in std::fs::read_dir(dir).map_err(io_err(dir))? {
            let path = entry.map_err(io_err(dir))?.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }

            let bytes = std::fs::read(&path).map_err(io_err(&path))?;
            debug!("Loaded template {} from {:?}", name, path);
            registry.insert(name, String::from_utf8_lossy(&bytes));
        }

        info!("Loaded {} query templates from {:?}", registry.len(), dir);
        Ok(registry)
    }

    /// Register a template, replacing any existing one of the same type.
    pub fn insert(&mut self, test_type: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(test_type.into(), template.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, test_type: impl Into<String>, template: impl Into<String>) -> Self {
        self.insert(test_type, template);
        self
    }

    pub fn get(&self, test_type: &str) -> Option<&str> {
        self.templates.get(test_type).map(|t| t.as_str())
    }

    pub fn contains(&self, test_type: &str) -> bool {
        self.templates.contains_key(test_type)
    }

    /// Template type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_dir_keys_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("unify"), "<GOAL>,<EXPECTED>").unwrap();
        std::fs::write(dir.path().join("count.pl"), "aggregate_all(count, <GOAL>, N)").unwrap();
        std::fs::write(dir.path().join(".hidden"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let registry = TemplateRegistry::load_from_dir(dir.path()).unwrap();

        assert_eq!(registry.names(), vec!["count.pl", "unify"]);
        assert_eq!(registry.get("unify"), Some("<GOAL>,<EXPECTED>"));
        assert!(!registry.contains("nested"));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TemplateRegistry::load_from_dir(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, RegistryError::MissingDirectory { .. }));
    }

    #[test]
    fn test_insert_replaces() {
        let registry = TemplateRegistry::new().with("t", "a").with("t", "b");
        assert_eq!(registry.get("t"), Some("b"));
        assert_eq!(registry.len(), 1);
    }
}
