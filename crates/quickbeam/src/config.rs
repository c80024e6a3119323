//! Project configuration for the module loader

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Where the module loader looks for source files.
///
/// Loadable from a JSON project file:
///
/// ```json
/// {
///   "project_root": ".",
///   "root_namespace": "App",
///   "stdlib_root": "/usr/share/quickbeam/std"
/// }
/// ```
///
/// Every field is optional. Relative paths in a project file are resolved
/// against the directory containing that file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project root directory
    pub project_root: PathBuf,

    /// Source root; `<project_root>/src` when unset
    pub source_root: Option<PathBuf>,

    /// Namespace prefix owned by this project (e.g. `App`)
    pub root_namespace: Option<String>,

    /// Standard library root
    pub stdlib_root: Option<PathBuf>,

    /// Third-party sources; `<project_root>/vendor` when unset
    pub vendor_dir: Option<PathBuf>,

    /// Source file extension, without the dot
    pub extension: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            source_root: None,
            root_namespace: None,
            stdlib_root: None,
            vendor_dir: None,
            extension: "qb".to_string(),
        }
    }
}

impl ProjectConfig {
    /// Configuration rooted at `project_root` with every other field defaulted.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Self::default()
        }
    }

    /// Load a JSON project file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ProjectConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(config.resolved_against(base))
    }

    /// Make every relative path absolute with respect to `base`.
    pub fn resolved_against(mut self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.project_root = resolve(self.project_root);
        self.source_root = self.source_root.map(resolve);
        self.stdlib_root = self.stdlib_root.map(resolve);
        self.vendor_dir = self.vendor_dir.map(resolve);
        self
    }

    /// Set the source root.
    pub fn with_source_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_root = Some(path.into());
        self
    }

    /// Set the root namespace.
    pub fn with_root_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.root_namespace = Some(namespace.into());
        self
    }

    /// Set the standard library root.
    pub fn with_stdlib_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdlib_root = Some(path.into());
        self
    }

    /// Set the vendor directory.
    pub fn with_vendor_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.vendor_dir = Some(path.into());
        self
    }

    /// Set the source file extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Effective source root.
    pub fn source_root(&self) -> PathBuf {
        self.source_root
            .clone()
            .unwrap_or_else(|| self.project_root.join("src"))
    }

    /// Effective vendor directory.
    pub fn vendor_dir(&self) -> PathBuf {
        self.vendor_dir
            .clone()
            .unwrap_or_else(|| self.project_root.join("vendor"))
    }
}
