//! Sequential, fail-fast task runner
//!
//! Runs the tasks of an [`ExecutionPlan`] one at a time in plan order. The first
//! failure halts the run: the failing task keeps its error and every task after it
//! is marked skipped.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use colored::*;
use tracing::{debug, info};

use crate::actions::ActionContext;
use crate::execution::command::ProcessInvoker;
use crate::execution::dependencies::ExecutionPlan;
use crate::registry::TaskRegistry;
use crate::tasks::get_task_color;
use crate::types::ChoreError;

/// Per-task state during one run
#[derive(Debug)]
pub enum TaskState {
    Pending,
    Running,
    Succeeded,
    Failed(ChoreError),
    Skipped,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Succeeded | TaskState::Failed(_) | TaskState::Skipped
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskState::Pending => "pending",
            TaskState::Running => "running",
            TaskState::Succeeded => "succeeded",
            TaskState::Failed(_) => "failed",
            TaskState::Skipped => "skipped",
        }
    }
}

#[derive(Debug)]
pub struct TaskOutcome {
    pub name: String,
    pub state: TaskState,
    /// Wall time spent in the task's action; `None` for tasks that never ran
    pub duration: Option<Duration>,
}

/// Outcome of running a plan
#[derive(Debug)]
pub struct ExecutionResult {
    outcomes: Vec<TaskOutcome>,
}

impl ExecutionResult {
    /// Outcomes in plan order
    pub fn outcomes(&self) -> &[TaskOutcome] {
        &self.outcomes
    }

    pub fn is_success(&self) -> bool {
        self.outcomes
            .iter()
            .all(|outcome| matches!(outcome.state, TaskState::Succeeded))
    }

    /// The task that failed and its error, if any
    pub fn failure(&self) -> Option<(&str, &ChoreError)> {
        self.outcomes.iter().find_map(|outcome| match &outcome.state {
            TaskState::Failed(err) => Some((outcome.name.as_str(), err)),
            _ => None,
        })
    }

    pub fn state_of(&self, name: &str) -> Option<&TaskState> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.name == name)
            .map(|outcome| &outcome.state)
    }

    pub fn count(&self, predicate: impl Fn(&TaskState) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| predicate(&outcome.state))
            .count()
    }

    pub fn total_duration(&self) -> Duration {
        self.outcomes.iter().filter_map(|outcome| outcome.duration).sum()
    }
}

/// Configuration for the task runner
#[derive(Debug, Clone)]
pub struct TaskRunnerConfig {
    /// Working directory for tasks that do not declare one
    pub default_working_dir: PathBuf,
    /// Suppress the per-task headers
    pub quiet: bool,
}

impl Default for TaskRunnerConfig {
    fn default() -> Self {
        Self {
            default_working_dir: PathBuf::from("."),
            quiet: false,
        }
    }
}

pub struct TaskRunner<'a> {
    registry: &'a TaskRegistry,
    invoker: &'a dyn ProcessInvoker,
    config: TaskRunnerConfig,
}

impl<'a> TaskRunner<'a> {
    pub fn new(registry: &'a TaskRegistry, invoker: &'a dyn ProcessInvoker) -> Self {
        Self {
            registry,
            invoker,
            config: TaskRunnerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: TaskRunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// Run every task of `plan` in order, halting at the first failure
    pub fn execute(&self, plan: &ExecutionPlan) -> ExecutionResult {
        let mut outcomes: Vec<TaskOutcome> = plan
            .tasks()
            .iter()
            .map(|name| TaskOutcome {
                name: name.clone(),
                state: TaskState::Pending,
                duration: None,
            })
            .collect();

        let mut halted = false;
        for outcome in &mut outcomes {
            if halted {
                outcome.state = TaskState::Skipped;
                continue;
            }

            outcome.state = TaskState::Running;
            let started = Instant::now();
            let result = self.run_task(&outcome.name);
            outcome.duration = Some(started.elapsed());

            outcome.state = match result {
                Ok(()) => {
                    debug!(task = %outcome.name, elapsed = ?outcome.duration, "task succeeded");
                    TaskState::Succeeded
                }
                Err(err) => {
                    info!(task = %outcome.name, error = %err, "task failed, halting");
                    halted = true;
                    TaskState::Failed(err)
                }
            };
        }

        ExecutionResult { outcomes }
    }

    fn run_task(&self, name: &str) -> Result<(), ChoreError> {
        let task = self.registry.lookup(name)?;
        let working_dir = task
            .working_dir()
            .unwrap_or(self.config.default_working_dir.as_path());

        if !self.config.quiet {
            self.print_header(name, task.description());
        }

        let ctx = ActionContext {
            task_name: name,
            working_dir,
            invoker: self.invoker,
        };
        task.action().run(&ctx)
    }

    fn print_header(&self, name: &str, description: Option<&str>) {
        println!();
        println!(
            "┌─ {} {}",
            "Running task".bold(),
            name.color(get_task_color(name)).bold()
        );
        if let Some(description) = description {
            println!("└─ {}", description.bright_black());
        }
    }
}
