//! Dependency-driven module loader
//!
//! A `use A.B.C` statement resolves `A.B.C` to a class or interface,
//! loading source files on demand:
//!
//! 1. already registered (or cached from an earlier `use`): bind it
//! 2. otherwise locate a file from the namespace path, parse it, and
//!    evaluate its top-level statements in a child of the globals
//! 3. look the target up again in the namespace registry, then in the
//!    file's own top-level scope
//!
//! Every file is evaluated at most once per session, successful or not: a
//! file whose evaluation failed keeps its error and is not run again. A file
//! that is still
//! being evaluated when a nested `use` reaches it again is a cycle; the
//! nested `use` binds nothing and the class is found later by name.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::config::ProjectConfig;
use crate::environment::Environment;
use crate::error::EvalError;
use crate::interpreter::Interpreter;
use crate::value::Value;

/// Load state of one source file, keyed by canonical path.
#[derive(Debug, Clone)]
pub(crate) enum FileState {
    /// Top-level statements are being evaluated
    Loading,
    /// Finished; holds the file's top-level scope
    Loaded(Environment),
    /// Failed to read, parse or evaluate; later loads report the same error
    Failed(EvalError),
}

/// Per-session loader state.
#[derive(Debug)]
pub(crate) struct ModuleLoader {
    pub(crate) config: ProjectConfig,

    /// Whether `namespace` declarations get the root namespace prepended
    pub(crate) prefixing: bool,

    /// Current nesting of file loads
    pub(crate) depth: usize,

    pub(crate) files: IndexMap<PathBuf, FileState>,

    /// Successful `use` resolutions by qualified path
    resolved: IndexMap<String, Value>,
}

impl ModuleLoader {
    pub(crate) fn new(config: ProjectConfig) -> Self {
        Self {
            config,
            prefixing: true,
            depth: 0,
            files: IndexMap::new(),
            resolved: IndexMap::new(),
        }
    }

    /// Top-level scopes of every fully loaded file.
    pub(crate) fn file_envs(&self) -> Vec<Environment> {
        self.files
            .values()
            .filter_map(|state| match state {
                FileState::Loaded(env) => Some(env.clone()),
                FileState::Loading | FileState::Failed(_) => None,
            })
            .collect()
    }

    /// Namespace with the root namespace prefix removed, if it has one.
    fn strip_root<'a>(&self, namespace: &'a str) -> Option<&'a str> {
        let root = self.config.root_namespace.as_deref()?;
        if namespace == root {
            Some("")
        } else {
            namespace
                .strip_prefix(root)
                .and_then(|rest| rest.strip_prefix('.'))
        }
    }

    /// Candidate files for `namespace.class`, in priority order.
    pub(crate) fn candidates(&self, namespace: &str, class: &str) -> Vec<PathBuf> {
        let file = format!("{class}.{}", self.config.extension);
        let full = namespace_dir(namespace);
        let stripped = self.strip_root(namespace).map(namespace_dir);

        let mut bases = vec![self.config.source_root(), self.config.project_root.clone()];
        bases.dedup();

        let mut paths = Vec::new();
        for base in &bases {
            if let Some(stripped) = &stripped {
                paths.push(base.join(stripped).join(&file));
            }
            paths.push(base.join(&full).join(&file));
        }
        paths.push(self.config.vendor_dir().join(&full).join(&file));
        if let Some(stdlib) = &self.config.stdlib_root {
            paths.push(stdlib.join(&full).join(&file));
        }

        let mut unique: Vec<PathBuf> = Vec::with_capacity(paths.len());
        for path in paths {
            if !unique.contains(&path) {
                unique.push(path);
            }
        }
        unique
    }

    /// Find the file that should define `namespace.class`.
    ///
    /// Falls back to scanning the candidate directories for a file whose text
    /// declares `class <name>`, for files not named after their class.
    pub(crate) fn locate(&self, path: &str, namespace: &str, class: &str) -> Result<PathBuf, EvalError> {
        let candidates = self.candidates(namespace, class);
        for candidate in &candidates {
            debug!(candidate = %candidate.display(), "checking module candidate");
            if candidate.is_file() {
                return Ok(canonical(candidate));
            }
        }

        let mut dirs: Vec<&Path> = Vec::new();
        for candidate in &candidates {
            if let Some(dir) = candidate.parent() {
                if dir.is_dir() && !dirs.contains(&dir) {
                    dirs.push(dir);
                }
            }
        }
        for dir in dirs {
            if let Some(found) = self.scan_dir(dir, class) {
                debug!(file = %found.display(), class, "found class by scanning");
                return Ok(canonical(&found));
            }
        }

        Err(EvalError::ModuleNotFound {
            path: path.to_string(),
            attempted: candidates,
        })
    }

    fn scan_dir(&self, dir: &Path, class: &str) -> Option<PathBuf> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .ok()?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.is_file()
                    && p.extension().and_then(|e| e.to_str()) == Some(self.config.extension.as_str())
            })
            .collect();
        files.sort();
        files.into_iter().find(|file| {
            fs::read_to_string(file)
                .map(|text| declares_class(&text, class))
                .unwrap_or(false)
        })
    }

    /// Whether `file` lives under a tree whose `namespace` declarations are
    /// taken as written.
    fn is_external(&self, file: &Path) -> bool {
        let vendor = self.config.vendor_dir();
        std::iter::once(vendor)
            .chain(self.config.stdlib_root.clone())
            .any(|root| file.starts_with(canonical(&root)))
    }
}

fn namespace_dir(namespace: &str) -> PathBuf {
    namespace.split('.').filter(|s| !s.is_empty()).collect()
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Textual check for `class <name>` in source.
fn declares_class(text: &str, name: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    words.windows(2).any(|pair| {
        pair[0] == "class"
            && pair[1].trim_end_matches(|c: char| !c.is_alphanumeric() && c != '_') == name
    })
}

impl Interpreter {
    /// Execute `use path [as alias]` in `env`.
    ///
    /// The target is bound under its alias (or last path segment) and under
    /// its full dotted path. A target that cannot be found is recorded
    /// against the local name and reported when that name is used.
    pub(crate) fn import(
        &mut self,
        path: &str,
        alias: Option<&str>,
        env: &Environment,
    ) -> Result<(), EvalError> {
        let local = alias
            .or_else(|| path.rsplit('.').next())
            .unwrap_or(path)
            .to_string();

        match self.resolve_import(path) {
            Ok(Some(value)) => {
                self.unresolved_imports.shift_remove(&local);
                if local != path {
                    env.define(path, value.clone());
                }
                env.define(local, value);
                Ok(())
            }
            Ok(None) => {
                debug!(path, "import cycle, binding deferred to lookup by name");
                Ok(())
            }
            Err(err) if err.is_unresolved_import(path) => {
                warn!(path, alias = %local, error = %err, "unresolved import");
                self.unresolved_imports.insert(local, err);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Resolve a qualified path to a class or interface, loading files as needed.
    ///
    /// `Ok(None)` means the defining file is mid-evaluation (a cycle).
    pub(crate) fn resolve_import(&mut self, path: &str) -> Result<Option<Value>, EvalError> {
        if let Some(value) = self.lookup_registered(path) {
            return Ok(Some(value));
        }
        self.load_class(path)
    }

    /// Look a dotted path up in the registry, as written and with the root
    /// namespace prepended.
    pub(crate) fn lookup_registered(&self, path: &str) -> Option<Value> {
        self.namespaces
            .lookup_qualified(path)
            .or_else(|| self.namespaces.lookup_qualified(&self.qualify_namespace(path)))
    }

    fn load_class(&mut self, path: &str) -> Result<Option<Value>, EvalError> {
        if let Some(value) = self.loader.resolved.get(path) {
            debug!(path, "import already resolved");
            return Ok(Some(value.clone()));
        }
        let Some((namespace, class)) = path.rsplit_once('.') else {
            return Err(EvalError::UndefinedClass {
                name: path.to_string(),
            });
        };

        if self.loader.depth >= self.ctx.max_import_depth {
            return Err(EvalError::ImportDepthExceeded {
                path: path.to_string(),
                max: self.ctx.max_import_depth,
            });
        }

        let file = self.loader.locate(path, namespace, class)?;
        let file_env = match self.loader.files.get(&file) {
            Some(FileState::Loading) => return Ok(None),
            Some(FileState::Loaded(env)) => {
                debug!(file = %file.display(), "file already loaded");
                env.clone()
            }
            Some(FileState::Failed(err)) => {
                debug!(file = %file.display(), "file previously failed");
                return Err(err.clone());
            }
            None => self.load_file(&file)?,
        };

        let value = self
            .lookup_registered(path)
            .or_else(|| {
                file_env
                    .get(class)
                    .filter(|v| matches!(v, Value::Class(_) | Value::Interface(_)))
            })
            .ok_or_else(|| EvalError::UndefinedClass {
                name: path.to_string(),
            })?;
        self.loader.resolved.insert(path.to_string(), value.clone());
        Ok(Some(value))
    }

    /// Parse and evaluate one file, returning its top-level scope.
    ///
    /// The outcome is recorded either way; a failure is never retried.
    pub(crate) fn load_file(&mut self, file: &Path) -> Result<Environment, EvalError> {
        debug!(file = %file.display(), depth = self.loader.depth, "loading module");
        match self.evaluate_file(file) {
            Ok(env) => {
                self.loader
                    .files
                    .insert(file.to_path_buf(), FileState::Loaded(env.clone()));
                Ok(env)
            }
            Err(err) => {
                warn!(file = %file.display(), error = %err, "module failed to load");
                self.loader
                    .files
                    .insert(file.to_path_buf(), FileState::Failed(err.clone()));
                Err(err)
            }
        }
    }

    fn evaluate_file(&mut self, file: &Path) -> Result<Environment, EvalError> {
        let source = fs::read_to_string(file).map_err(|e| EvalError::Io {
            file: file.to_path_buf(),
            message: e.to_string(),
        })?;
        let program = self.parse(&source, file)?;

        self.loader.files.insert(file.to_path_buf(), FileState::Loading);
        let env = self.globals.new_child();
        let saved_namespace = self.current_namespace.take();
        let saved_prefixing = self.loader.prefixing;
        if self.loader.is_external(file) {
            self.loader.prefixing = false;
        }
        self.loader.depth += 1;

        let result = self.eval_top_level(&program.stmts, &env);

        self.loader.depth -= 1;
        self.loader.prefixing = saved_prefixing;
        self.current_namespace = saved_namespace;

        result.map(|_| env)
    }

    /// Apply root-namespace prefixing to a declared namespace.
    pub(crate) fn qualify_namespace(&self, name: &str) -> String {
        match self.loader.config.root_namespace.as_deref() {
            Some(root)
                if self.loader.prefixing
                    && name != root
                    && !name.starts_with(&format!("{root}.")) =>
            {
                format!("{root}.{name}")
            }
            _ => name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn loader(root: &str) -> ModuleLoader {
        ModuleLoader::new(
            ProjectConfig::new(root)
                .with_root_namespace("App")
                .with_stdlib_root("/std"),
        )
    }

    #[test]
    fn test_candidate_order() {
        let paths = loader("/proj").candidates("App.Models", "User");
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/proj/src/Models/User.qb"),
                PathBuf::from("/proj/src/App/Models/User.qb"),
                PathBuf::from("/proj/Models/User.qb"),
                PathBuf::from("/proj/App/Models/User.qb"),
                PathBuf::from("/proj/vendor/App/Models/User.qb"),
                PathBuf::from("/std/App/Models/User.qb"),
            ]
        );
    }

    #[test]
    fn test_candidates_without_root_namespace() {
        let loader = ModuleLoader::new(ProjectConfig::new("/proj"));
        let paths = loader.candidates("Lib", "Queue");
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/proj/src/Lib/Queue.qb"),
                PathBuf::from("/proj/Lib/Queue.qb"),
                PathBuf::from("/proj/vendor/Lib/Queue.qb"),
            ]
        );
    }

    #[test]
    fn test_root_namespace_maps_to_source_root() {
        let paths = loader("/proj").candidates("App", "Main");
        assert_eq!(paths[0], PathBuf::from("/proj/src/Main.qb"));
    }

    #[test]
    fn test_declares_class() {
        assert!(declares_class("namespace A\nclass Widget {\n}", "Widget"));
        assert!(declares_class("class Widget{}", "Widget"));
        assert!(!declares_class("class Widgets {}", "Widget"));
        assert!(!declares_class("// Widget\nfunc x() {}", "Widget"));
    }

    #[test]
    fn test_locate_reports_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ModuleLoader::new(ProjectConfig::new(dir.path()));
        match loader.locate("Lib.Missing", "Lib", "Missing") {
            Err(EvalError::ModuleNotFound { path, attempted }) => {
                assert_eq!(path, "Lib.Missing");
                assert_eq!(attempted.len(), 3);
            }
            other => panic!("expected ModuleNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_locate_scans_directory() {
        let dir = tempfile::tempdir().unwrap();
        let lib = dir.path().join("src").join("Lib");
        fs::create_dir_all(&lib).unwrap();
        fs::write(lib.join("shapes.qb"), "namespace Lib\nclass Circle {}\n").unwrap();

        let loader = ModuleLoader::new(ProjectConfig::new(dir.path()));
        let found = loader.locate("Lib.Circle", "Lib", "Circle").unwrap();
        assert_eq!(found, canonical(&lib.join("shapes.qb")));
    }
}
