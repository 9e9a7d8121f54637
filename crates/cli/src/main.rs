use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chore_core::properties::Properties;
use chore_core::types::ChoreError;
use chore_core::workspace_manager::{WorkspaceManager, WorkspaceManagerConfig};
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::EnvFilter;

mod commands;

/// Exit code for a task that failed while running
pub const EXIT_TASK_FAILURE: u8 = 1;
/// Exit code for problems found before anything ran
pub const EXIT_CONFIGURATION_ERROR: u8 = 2;

/// Chore - A task runner for build tool glue
#[derive(Parser)]
#[command(name = "chore")]
#[command(about = "Run named build tasks and their dependencies")]
#[command(version)]
#[command(after_help = "ENVIRONMENT:\n    CHORE_LOG=debug    Log filter (overrides -v)")]
struct Cli {
    /// Path to the workspace root (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Task file to load instead of chore.yml / chore.yaml / chore.toml
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Set a property, overriding the task file (repeatable)
    #[arg(short = 'P', long = "property", value_name = "NAME=VALUE", value_parser = parse_property)]
    properties: Vec<(String, String)>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run tasks and everything they depend on
    Run {
        /// Task names; a bare name runs that task in every project defining it
        #[arg(required = true)]
        tasks: Vec<String>,
        /// Print the execution plan without running anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the execution plan for tasks without running them
    Plan {
        #[arg(required = true)]
        tasks: Vec<String>,
    },
    /// List tasks by group
    List {
        /// Include tasks without a group
        #[arg(long)]
        all: bool,
    },
    /// Show the task dependency graph
    Graph,
    /// Print the JSON schema of the task file format
    Schema,
}

fn parse_property(input: &str) -> Result<(String, String), String> {
    Properties::parse_assignment(input).map_err(|e| e.to_string())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("CHORE_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn dispatch(cli: Cli) -> Result<ExitCode> {
    if let Commands::Schema = cli.command {
        return commands::schema::execute();
    }

    // Initialize workspace manager with all business logic
    let manager = WorkspaceManager::new(WorkspaceManagerConfig {
        workspace_root: cli.workspace,
        config_file: cli.file,
        properties: cli.properties.into_iter().collect(),
    })
    .context("Failed to load workspace")?;

    // Execute command (CLI layer only handles presentation)
    match cli.command {
        Commands::Run { tasks, dry_run } => commands::run::execute(&manager, &tasks, dry_run),
        Commands::Plan { tasks } => commands::plan::execute(&manager, &tasks),
        Commands::List { all } => commands::list::execute(&manager, all),
        Commands::Graph => commands::graph::execute(&manager),
        Commands::Schema => commands::schema::execute(),
    }
}

/// Exit code for an error that stopped a command. Anything raised before a task
/// could run is a configuration error.
fn error_exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ChoreError>() {
        Some(e) if !e.is_configuration_error() => EXIT_TASK_FAILURE,
        _ => EXIT_CONFIGURATION_ERROR,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::from(error_exit_code(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use chore_core::actions::ActionContext;
    use chore_core::execution::{
        resolve_execution_plan, CommandExecutor, ExecutionResult, TaskRunner, TaskRunnerConfig,
    };
    use chore_core::registry::{Task, TaskRegistry};
    use chore_core::types::ChoreResult;

    use super::*;

    fn succeed(_ctx: &ActionContext<'_>) -> ChoreResult<()> {
        Ok(())
    }

    fn fail(_ctx: &ActionContext<'_>) -> ChoreResult<()> {
        Err(ChoreError::ProcessExecution {
            program: "flutter".into(),
            code: Some(1),
        })
    }

    fn run(registry: &TaskRegistry, root: &str) -> ExecutionResult {
        let plan = resolve_execution_plan(registry, &[root.to_string()]).unwrap();
        TaskRunner::new(registry, &CommandExecutor::default())
            .with_config(TaskRunnerConfig {
                quiet: true,
                ..TaskRunnerConfig::default()
            })
            .execute(&plan)
    }

    fn manager(yaml: &str) -> (tempfile::TempDir, WorkspaceManager) {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("chore.yml"), yaml).unwrap();
        let manager = WorkspaceManager::new(WorkspaceManagerConfig {
            workspace_root: temp_dir.path().to_path_buf(),
            config_file: None,
            properties: Properties::new(),
        })
        .unwrap();
        (temp_dir, manager)
    }

    #[test]
    fn test_run_exit_codes() {
        let mut registry = TaskRegistry::new();
        registry.register(Task::new("pubGet", succeed)).unwrap();
        registry
            .register(Task::new("analyze", fail).with_dependencies(["pubGet"]))
            .unwrap();

        assert_eq!(commands::run::exit_code(&run(&registry, "pubGet")), 0);
        assert_eq!(
            commands::run::exit_code(&run(&registry, "analyze")),
            EXIT_TASK_FAILURE
        );
    }

    #[test]
    fn test_planning_errors_are_configuration_errors() {
        let (_dir, manager) = manager(
            "tasks:\n  - name: X\n    dependsOn: [Y]\n  - name: Y\n    dependsOn: [X]\n",
        );

        let unknown = commands::plan::execute(&manager, &["deploy".to_string()]).unwrap_err();
        assert!(matches!(
            unknown.downcast_ref::<ChoreError>(),
            Some(ChoreError::UnknownTask { .. })
        ));
        assert_eq!(error_exit_code(&unknown), EXIT_CONFIGURATION_ERROR);

        let cycle = commands::run::execute(&manager, &["X".to_string()], false).unwrap_err();
        assert!(format!("{:#}", cycle).contains("X -> Y -> X"));
        assert_eq!(error_exit_code(&cycle), EXIT_CONFIGURATION_ERROR);
    }

    #[test]
    fn test_missing_task_file_is_configuration_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = dispatch(Cli::parse_from([
            "chore",
            "-w",
            temp_dir.path().to_str().unwrap(),
            "list",
        ]))
        .unwrap_err();
        assert_eq!(error_exit_code(&err), EXIT_CONFIGURATION_ERROR);
    }

    #[test]
    fn test_process_errors_map_to_task_failure() {
        let err = anyhow::Error::from(ChoreError::ProcessLaunch {
            program: "buf".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
        .context("Failed to run");
        assert_eq!(error_exit_code(&err), EXIT_TASK_FAILURE);
        assert_eq!(
            error_exit_code(&anyhow::anyhow!("unexpected")),
            EXIT_CONFIGURATION_ERROR
        );
    }
}
