//! docdeid-tasks - run docdeid's formatting, linting, test and docs tooling.
//!
//! Tasks run one at a time in the order given; the first failing tool
//! stops the run and its exit code becomes ours. In fix mode the linters
//! only report, so `lint` never stops a local run.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use docdeid_tasks::core::parse_line_length;
use docdeid_tasks::pipeline::StepStatus;
use docdeid_tasks::tasks::{catalogue, plan};
use docdeid_tasks::{
    Config, Executor, Invocation, Mode, Overrides, Pipeline, PipelineResult, Settings, APP_NAME,
};

/// Run docdeid's formatting, linting, test and documentation tasks
#[derive(Parser)]
#[command(name = "docdeid-tasks")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

/// Options shared by every subcommand.
#[derive(Args)]
struct GlobalArgs {
    /// Verify only and enforce lint thresholds (same as CHECK=1)
    #[arg(
        long,
        global = true,
        env = "CHECK",
        value_name = "0|1",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "1",
        value_parser = parse_mode
    )]
    check: Option<Mode>,

    /// Maximum line length for black, docformatter and flake8
    #[arg(long, global = true, env = "MAX_LINE_LENGTH", value_parser = parse_max_line_length)]
    max_line_length: Option<u32>,

    /// Config file (default: docdeid-tasks.toml in the project directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Project directory
    #[arg(short = 'C', long, global = true, default_value = ".")]
    directory: PathBuf,

    /// Show what would be executed without running
    #[arg(long, global = true)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

impl GlobalArgs {
    fn overrides(&self) -> Overrides {
        Overrides { mode: self.check, max_line_length: self.max_line_length }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or more tasks
    Run {
        /// Tasks to run, plus optional CHECK=.. / MAX_LINE_LENGTH=.. assignments
        #[arg(required = true, value_name = "TASK|KEY=VALUE")]
        operands: Vec<String>,
    },

    /// Print the commands tasks would run, without running them
    Plan {
        /// Tasks to plan, plus optional CHECK=.. / MAX_LINE_LENGTH=.. assignments
        #[arg(required = true, value_name = "TASK|KEY=VALUE")]
        operands: Vec<String>,
    },

    /// List all available tasks
    List {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show resolved settings
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn parse_mode(value: &str) -> Result<Mode, String> {
    Mode::from_flag(value).map_err(|e| e.to_string())
}

fn parse_max_line_length(value: &str) -> Result<u32, String> {
    parse_line_length(value).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let Cli { command, global } = Cli::parse();

    // Setup logging
    let filter = if global.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    match command {
        Commands::Run { operands } => cmd_run(&global, &operands, global.dry_run),
        Commands::Plan { operands } => cmd_run(&global, &operands, true),
        Commands::List { format } => cmd_list(&format),
        Commands::Config { path } => cmd_config(&global, path),
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}

/// Load the explicit config file, or look one up for `root`.
fn load_config(global: &GlobalArgs, root: &Path) -> Result<Config> {
    match &global.config {
        Some(path) => {
            let path = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref());
            Ok(Config::load_from_file(&path)?)
        }
        None => Ok(Config::load(root)?),
    }
}

/// Check the project directory exists.
fn project_root(global: &GlobalArgs) -> Result<PathBuf> {
    let root = global.directory.clone();
    if !root.is_dir() {
        anyhow::bail!("Project directory '{}' does not exist", root.display());
    }
    Ok(root)
}

/// Run (or plan) tasks.
fn cmd_run(global: &GlobalArgs, operands: &[String], dry_run: bool) -> Result<()> {
    let root = project_root(global)?;
    let config = load_config(global, &root)?;
    let invocation = Invocation::parse(operands, global.overrides())?;
    let settings = Settings::resolve(&root, &config, &invocation.overrides);

    tracing::debug!(
        mode = %settings.mode,
        max_line_length = settings.max_line_length,
        package = %settings.package,
        "Resolved settings"
    );

    let steps = plan(&invocation.tasks, &settings);

    if dry_run {
        let pipeline = Pipeline::new(Executor::new(), &root).dry_run(true);
        pipeline.run_with_progress(&steps, |_, _, step| {
            println!("[{}] {}", step.task, step.describe());
        });
        return Ok(());
    }

    let interrupt = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&interrupt);
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
            .context("Failed to install Ctrl-C handler")?;
    }

    let pipeline = Pipeline::new(Executor::new(), &root).interrupt_flag(interrupt);
    let result = pipeline.run_with_progress(&steps, |_, _, step| {
        println!("==> [{}] {}", step.task, step.describe());
    });

    report(&result);

    if !result.success() {
        std::process::exit(result.exit_code());
    }

    Ok(())
}

/// Print the outcome of a run.
fn report(result: &PipelineResult) {
    for warned in result.warnings() {
        match warned.status {
            StepStatus::Warned(Some(code)) => {
                eprintln!("[{}] reported problems (exit code {}), continuing", warned.step.task, code);
            }
            _ => eprintln!("[{}] reported problems, continuing", warned.step.task),
        }
    }

    if result.interrupted {
        eprintln!("\nInterrupted");
    } else if let Some(failure) = result.first_failure() {
        match (&failure.error, &failure.status) {
            (Some(error), _) => eprintln!("\n[{}] {}", failure.step.task, error),
            (None, StepStatus::Failed(Some(code))) => {
                eprintln!("\n[{}] failed with exit code {}", failure.step.task, code);
            }
            (None, _) => eprintln!("\n[{}] terminated by signal", failure.step.task),
        }
    }

    let skipped: Vec<String> = result
        .steps
        .iter()
        .filter(|s| s.status == StepStatus::Skipped)
        .map(|s| s.step.task.to_string())
        .collect();
    if !skipped.is_empty() {
        eprintln!("Skipped: {}", skipped.join(", "));
    }

    if result.success() {
        println!(
            "\nDone: {} step(s) in {:.1}s",
            result.steps.len(),
            result.total_duration.as_secs_f64()
        );
    }
}

/// List available tasks.
fn cmd_list(format: &str) -> Result<()> {
    let entries = catalogue();

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&entries)?;
            println!("{json}");
        }
        "text" => {
            for entry in &entries {
                println!("{:<12} {}", entry.name, entry.description);
                if entry.aggregate {
                    println!("{:<12}   -> {}", "", entry.runs.join(", "));
                }
            }
            println!("\nTotal: {} tasks", entries.len());
        }
        other => anyhow::bail!("Unknown format '{other}'. Supported: text, json"),
    }

    Ok(())
}

/// Show the config file path or the resolved settings.
fn cmd_config(global: &GlobalArgs, show_path: bool) -> Result<()> {
    let root = project_root(global)?;

    if show_path {
        let path = global.config.clone().or_else(|| Config::locate(&root));
        match path {
            Some(path) => println!("{}", path.display()),
            None => println!("(no config file, using defaults)"),
        }
        return Ok(());
    }

    let config = load_config(global, &root)?;
    let settings = Settings::resolve(&root, &config, &global.overrides());
    let content = toml::to_string_pretty(&settings).context("Failed to serialize settings")?;
    print!("{content}");

    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, APP_NAME, &mut io::stdout());
}
