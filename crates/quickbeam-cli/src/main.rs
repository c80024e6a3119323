use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quickbeam::frontends::QuickbeamFrontend;
use quickbeam::{Interpreter, LanguageFrontend, ProjectConfig, Value};
use tracing::debug;

#[derive(Parser)]
#[command(name = "quickbeam", about = "The Quickbeam interpreter", version)]
struct Cli {
    /// Log module resolution and class registration
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a program and call its static main
    Run {
        file: PathBuf,
        /// JSON project file (defaults to quickbeam.json next to the program, if present)
        #[arg(long)]
        project: Option<PathBuf>,
        /// Standard library root
        #[arg(long = "std")]
        stdlib: Option<PathBuf>,
        /// Root namespace owned by the project
        #[arg(long)]
        root_namespace: Option<String>,
        /// Arguments passed to main
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Parse a file and report syntax errors without running it
    Check { file: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Run {
            file,
            project,
            stdlib,
            root_namespace,
            args,
        } => run(&file, project, stdlib, root_namespace, args),
        Command::Check { file } => check(&file),
    };

    match result {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// How a command ended, once its input could be read.
#[derive(Debug, PartialEq)]
enum Outcome {
    Success,
    /// The program or file failed; carries the formatted diagnostic
    Failure(String),
}

impl Outcome {
    fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Failure(message) => {
                eprintln!("{message}");
                ExitCode::FAILURE
            }
        }
    }
}

/// Install a `fmt` subscriber. `RUST_LOG` wins; `--verbose` defaults the
/// filter to debug output from the interpreter.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose { "quickbeam=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(
    file: &Path,
    project: Option<PathBuf>,
    stdlib: Option<PathBuf>,
    root_namespace: Option<String>,
) -> Result<ProjectConfig> {
    let dir = file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let project = project.or_else(|| Some(dir.join("quickbeam.json")).filter(|p| p.is_file()));

    let mut config = match project {
        Some(path) => ProjectConfig::from_file(&path)
            .with_context(|| format!("loading project file {}", path.display()))?,
        None => ProjectConfig::new(dir),
    };
    if let Some(stdlib) = stdlib {
        config = config.with_stdlib_root(stdlib);
    }
    if let Some(root) = root_namespace {
        config = config.with_root_namespace(root);
    }
    debug!(?config, "project configuration");
    Ok(config)
}

fn run(
    file: &Path,
    project: Option<PathBuf>,
    stdlib: Option<PathBuf>,
    root_namespace: Option<String>,
    args: Vec<String>,
) -> Result<Outcome> {
    let config = load_config(file, project, stdlib, root_namespace)?;
    let source = fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;

    let mut interp = Interpreter::with_config(config).with_args(args);
    match interp.run_file(file) {
        Value::Error(err) => Ok(Outcome::Failure(
            QuickbeamFrontend::new().format_error(&err, &source),
        )),
        _ => Ok(Outcome::Success),
    }
}

fn check(file: &Path) -> Result<Outcome> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    match QuickbeamFrontend::new().parse(&source, &file.display().to_string()) {
        Ok(program) => {
            println!("{}: ok ({} top-level statements)", file.display(), program.stmts.len());
            Ok(Outcome::Success)
        }
        Err(err) => Ok(Outcome::Failure(format!("error: {err}"))),
    }
}
