//! Interpreter session
//!
//! An [`Interpreter`] owns everything that lives for one program run: the
//! global environment, the namespace registry, module loader state, the
//! evaluation context and the output sink. Nothing here is process-global;
//! two interpreters never observe each other.

use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::debug;

use crate::ast::{Program, Stmt};
use crate::config::ProjectConfig;
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::error::EvalError;
use crate::eval::{call_value, Evaluate};
use crate::frontend::LanguageFrontend;
use crate::frontends::QuickbeamFrontend;
use crate::loader::{FileState, ModuleLoader};
use crate::namespace::NamespaceManager;
use crate::value::{BoundMethod, Class, Value};

/// In-memory output sink.
///
/// Clones share the same buffer, so a handle kept by the caller observes
/// everything the interpreter prints.
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl OutputBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.borrow()).into_owned()
    }

    /// Discard everything written so far.
    pub fn clear(&self) {
        self.buffer.borrow_mut().clear();
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A Quickbeam interpreter session.
///
/// # Example
///
/// ```
/// use quickbeam::{Interpreter, Value};
///
/// let mut interp = Interpreter::new();
/// let output = interp.capture_output();
/// let result = interp.run_source(
///     r#"
///     class App {
///         static func main() {
///             println("age: " + 5)
///             return 7 / 2
///         }
///     }
///     "#,
///     "<main>",
/// );
/// assert_eq!(result, Value::Int(3));
/// assert_eq!(output.contents(), "age: 5\n");
/// ```
pub struct Interpreter {
    pub(crate) globals: Environment,
    pub(crate) namespaces: NamespaceManager,
    pub(crate) loader: ModuleLoader,
    pub(crate) ctx: EvalContext,
    pub(crate) current_namespace: Option<String>,
    pub(crate) unresolved_imports: IndexMap<String, EvalError>,
    pub(crate) frontend: Rc<dyn LanguageFrontend>,
    output: Box<dyn Write>,
    args: Vec<String>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Create an interpreter with the default project configuration
    /// (rooted at the working directory) printing to stdout.
    pub fn new() -> Self {
        Self::with_config(ProjectConfig::default())
    }

    /// Create an interpreter for a project.
    pub fn with_config(config: ProjectConfig) -> Self {
        Self {
            globals: Environment::with_prelude(),
            namespaces: NamespaceManager::new(),
            loader: ModuleLoader::new(config),
            ctx: EvalContext::new(),
            current_namespace: None,
            unresolved_imports: IndexMap::new(),
            frontend: Rc::new(QuickbeamFrontend::new()),
            output: Box::new(io::stdout()),
            args: Vec::new(),
        }
    }

    /// Use a different frontend for source text and loaded modules.
    pub fn with_frontend(mut self, frontend: impl LanguageFrontend + 'static) -> Self {
        self.frontend = Rc::new(frontend);
        self
    }

    /// Replace the evaluation context (limits and interrupt flag).
    pub fn with_context(mut self, ctx: EvalContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// Send `print` output to `output`.
    pub fn with_output(mut self, output: impl Write + 'static) -> Self {
        self.output = Box::new(output);
        self
    }

    /// Arguments handed to a one-parameter `main`.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Redirect output into a fresh in-memory buffer and return a handle to it.
    pub fn capture_output(&mut self) -> OutputBuffer {
        let buffer = OutputBuffer::new();
        self.output = Box::new(buffer.clone());
        buffer
    }

    /// The global environment (prelude plus top-level bindings).
    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    /// The namespace registry.
    pub fn namespaces(&self) -> &NamespaceManager {
        &self.namespaces
    }

    /// The evaluation context.
    pub fn context(&self) -> &EvalContext {
        &self.ctx
    }

    /// The project configuration used by the module loader.
    pub fn config(&self) -> &ProjectConfig {
        &self.loader.config
    }

    /// The namespace declared most recently at the top level, if any.
    pub fn current_namespace(&self) -> Option<&str> {
        self.current_namespace.as_deref()
    }

    /// `use` targets that could not be resolved, keyed by local name.
    pub fn unresolved_imports(&self) -> &IndexMap<String, EvalError> {
        &self.unresolved_imports
    }

    pub(crate) fn output(&mut self) -> &mut dyn Write {
        self.output.as_mut()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Running Programs
    // ═══════════════════════════════════════════════════════════════════

    /// Run a program: evaluate its top-level statements, then resolve and
    /// call the single static `main`.
    ///
    /// Returns `main`'s return value, or the first unrecovered error.
    pub fn run(&mut self, program: &Program) -> Value {
        let top_level = self.eval_program(program);
        if top_level.is_error() {
            return top_level;
        }
        self.call_entry_point()
    }

    /// Parse and [`run`](Self::run) source text.
    pub fn run_source(&mut self, source: &str, file: &str) -> Value {
        match self.parse(source, Path::new(file)) {
            Ok(program) => self.run(&program),
            Err(err) => Value::error(err),
        }
    }

    /// Read, parse and [`run`](Self::run) a source file.
    ///
    /// The file is registered with the module loader so a `use` that
    /// resolves back to it is not evaluated a second time.
    pub fn run_file(&mut self, path: impl AsRef<Path>) -> Value {
        let path = path.as_ref();
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                return Value::error(EvalError::Io {
                    file: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };
        let program = match self.parse(&source, path) {
            Ok(program) => program,
            Err(err) => return Value::error(err),
        };

        let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.loader.files.insert(key.clone(), FileState::Loading);
        let top_level = self.eval_program(&program);
        self.loader
            .files
            .insert(key, FileState::Loaded(self.globals.clone()));
        if top_level.is_error() {
            return top_level;
        }
        self.call_entry_point()
    }

    /// Evaluate top-level statements only, without looking for `main`.
    ///
    /// Yields the value of the last statement (`null` for declarations),
    /// or the first error.
    pub fn eval_program(&mut self, program: &Program) -> Value {
        let globals = self.globals.clone();
        self.eval_top_level(&program.stmts, &globals).into()
    }

    /// Parse and [`eval_program`](Self::eval_program) source text.
    pub fn eval_source(&mut self, source: &str) -> Value {
        match self.parse(source, Path::new("<input>")) {
            Ok(program) => self.eval_program(&program),
            Err(err) => Value::error(err),
        }
    }

    pub(crate) fn parse(&self, source: &str, file: &Path) -> Result<Program, EvalError> {
        self.frontend
            .parse(source, &file.display().to_string())
            .map_err(|e| EvalError::ParseError {
                file: file.to_path_buf(),
                message: e.to_string(),
            })
    }

    /// Evaluate a file's statements in `env`.
    ///
    /// Signals that reach the top level of a file are errors.
    pub(crate) fn eval_top_level(
        &mut self,
        stmts: &[Stmt],
        env: &Environment,
    ) -> Result<Value, EvalError> {
        let mut last = Value::Null;
        for stmt in stmts {
            last = match stmt.eval(env, self) {
                Value::Error(err) => return Err(*err),
                Value::Return(_) => return Err(EvalError::ReturnOutsideFunction),
                Value::Break => return Err(EvalError::BreakOutsideLoop),
                Value::Continue => return Err(EvalError::ContinueOutsideLoop),
                value => value,
            };
        }
        Ok(last)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Entry Point
    // ═══════════════════════════════════════════════════════════════════

    /// Find the single class declaring a static `main`.
    ///
    /// Candidates come from every namespace, the global environment and the
    /// top level of every loaded file.
    pub fn resolve_entry_point(&self) -> Result<Rc<Class>, EvalError> {
        let mut candidates: Vec<Rc<Class>> = Vec::new();
        let mut consider = |class: &Rc<Class>| {
            if class.static_methods.contains_key("main")
                && !candidates.iter().any(|c| Rc::ptr_eq(c, class))
            {
                candidates.push(Rc::clone(class));
            }
        };

        for class in self.namespaces.all_classes() {
            consider(class);
        }
        let scopes = std::iter::once(self.globals.clone()).chain(self.loader.file_envs());
        for scope in scopes {
            for value in scope.values_in_current_scope() {
                if let Value::Class(class) = value {
                    consider(&class);
                }
            }
        }

        match candidates.len() {
            0 => Err(EvalError::MissingEntryPoint),
            1 => Ok(candidates.remove(0)),
            _ => {
                let mut classes: Vec<String> =
                    candidates.iter().map(|c| c.qualified_name()).collect();
                classes.sort();
                Err(EvalError::AmbiguousEntryPoint { classes })
            }
        }
    }

    fn call_entry_point(&mut self) -> Value {
        let class = match self.resolve_entry_point() {
            Ok(class) => class,
            Err(err) => return Value::error(err),
        };
        let Some(method) = class.static_methods.get("main").cloned() else {
            return Value::error(EvalError::MissingEntryPoint);
        };
        debug!(class = %class.qualified_name(), "calling entry point");

        let args = if method.arity() == 1 {
            let argv = self.args.iter().map(Value::string).collect();
            vec![Value::array(argv)]
        } else {
            vec![]
        };
        let main = Value::BoundMethod(Rc::new(BoundMethod {
            receiver: None,
            class: Rc::clone(&class),
            called: class,
            method,
        }));
        let result = call_value(self, &main, args);
        // Flush failures are not program errors
        let _ = self.output.flush();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_output_buffer_shares_storage() {
        let buffer = OutputBuffer::new();
        let mut handle = buffer.clone();
        write!(handle, "hi").unwrap();
        assert_eq!(buffer.contents(), "hi");
        buffer.clear();
        assert_eq!(buffer.contents(), "");
    }

    #[test]
    fn test_eval_source_yields_last_value() {
        let mut interp = Interpreter::new();
        assert_eq!(interp.eval_source("x := 2\nx * 21"), Value::Int(42));
    }

    #[test]
    fn test_top_level_return_is_an_error() {
        let mut interp = Interpreter::new();
        let result = interp.eval_source("return 1");
        assert_eq!(result.as_error(), Some(&EvalError::ReturnOutsideFunction));
    }

    #[test]
    fn test_top_level_break_is_an_error() {
        let mut interp = Interpreter::new();
        let result = interp.eval_source("break");
        assert_eq!(result.as_error(), Some(&EvalError::BreakOutsideLoop));
    }

    #[test]
    fn test_parse_errors_surface_as_values() {
        let mut interp = Interpreter::new();
        let result = interp.run_source("let = 3", "broken.qb");
        assert!(matches!(
            result.as_error(),
            Some(EvalError::ParseError { .. })
        ));
    }

    #[test]
    fn test_main_receives_arguments() {
        let mut interp = Interpreter::new().with_args(vec!["a".into(), "b".into()]);
        let result = interp.run_source(
            "class Cli { static func main(args) { return len(args) } }",
            "cli.qb",
        );
        assert_eq!(result, Value::Int(2));
    }
}
