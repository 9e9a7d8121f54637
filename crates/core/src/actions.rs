//! Task actions
//!
//! A [`TaskAction`] is the unit of work a task performs. Tasks loaded from task files
//! carry a [`Steps`] list; programmatic callers may register any closure.

pub mod files;

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;
use tracing::info;

use crate::configs::tasks::StepConfig;
use crate::execution::command::{Invocation, ProcessInvoker, ProcessOutput};
use crate::properties::Properties;
use crate::types::{ChoreError, ChoreResult};

/// Environment variable carrying the running task's name to child processes
pub const TASK_ENV_VAR: &str = "CHORE_TASK";

/// What an action gets to work with while its task runs
pub struct ActionContext<'a> {
    pub task_name: &'a str,
    pub working_dir: &'a Path,
    pub invoker: &'a dyn ProcessInvoker,
}

impl ActionContext<'_> {
    /// Resolve `path` against the task's working directory
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }

    /// Run an external program through the injected invoker
    pub fn exec(&self, invocation: Invocation) -> ChoreResult<ProcessOutput> {
        let invocation = if invocation.working_dir.is_none() {
            invocation.current_dir(self.working_dir)
        } else {
            invocation
        };
        self.invoker
            .run(&invocation.env(TASK_ENV_VAR, self.task_name))
    }
}

pub trait TaskAction {
    fn run(&self, ctx: &ActionContext<'_>) -> ChoreResult<()>;
}

impl<F> TaskAction for F
where
    F: Fn(&ActionContext<'_>) -> ChoreResult<()>,
{
    fn run(&self, ctx: &ActionContext<'_>) -> ChoreResult<()> {
        self(ctx)
    }
}

/// A single configured step with properties already substituted
#[derive(Debug, Clone)]
pub enum Step {
    Exec {
        program: String,
        args: Vec<String>,
        working_dir: Option<String>,
        env: Vec<(String, String)>,
    },
    Print(String),
    Copy {
        from: String,
        into: String,
        exclude: GlobSet,
    },
    DeleteMatching {
        roots: Vec<String>,
        pattern: Regex,
    },
}

impl Step {
    /// Build a step from its declaration, substituting properties and compiling
    /// globs and patterns so mistakes surface before execution.
    pub fn from_config(config: &StepConfig, properties: &Properties) -> ChoreResult<Self> {
        let step = match config {
            StepConfig::Exec(exec) => Step::Exec {
                program: properties.interpolate(&exec.executable)?,
                args: exec
                    .args
                    .iter()
                    .flatten()
                    .map(|arg| properties.interpolate(arg))
                    .collect::<ChoreResult<_>>()?,
                working_dir: exec
                    .working_dir
                    .as_deref()
                    .map(|dir| properties.interpolate(dir))
                    .transpose()?,
                env: exec
                    .env
                    .iter()
                    .flatten()
                    .map(|(k, v)| properties.interpolate(v).map(|v| (k.clone(), v)))
                    .collect::<ChoreResult<_>>()?,
            },
            StepConfig::Print(message) => Step::Print(properties.interpolate(message)?),
            StepConfig::Copy(copy) => {
                let mut builder = GlobSetBuilder::new();
                for pattern in copy.exclude.iter().flatten() {
                    let glob = Glob::new(&properties.interpolate(pattern)?).map_err(|e| {
                        ChoreError::Config(format!("Invalid exclude pattern '{}': {}", pattern, e))
                    })?;
                    builder.add(glob);
                }
                Step::Copy {
                    from: properties.interpolate(&copy.from)?,
                    into: properties.interpolate(&copy.into)?,
                    exclude: builder.build().map_err(|e| {
                        ChoreError::Config(format!("Invalid exclude patterns: {}", e))
                    })?,
                }
            }
            StepConfig::DeleteMatching(delete) => {
                let pattern = properties.interpolate(&delete.pattern)?;
                Step::DeleteMatching {
                    roots: delete
                        .roots
                        .iter()
                        .map(|root| properties.interpolate(root))
                        .collect::<ChoreResult<_>>()?,
                    pattern: files::anchored_regex(&pattern)?,
                }
            }
        };
        Ok(step)
    }

    fn run(&self, ctx: &ActionContext<'_>) -> ChoreResult<()> {
        match self {
            Step::Exec {
                program,
                args,
                working_dir,
                env,
            } => {
                let mut invocation = Invocation::new(program.as_str()).args(args.iter().cloned());
                if let Some(dir) = working_dir {
                    invocation = invocation.current_dir(ctx.resolve(dir));
                }
                for (key, value) in env {
                    invocation = invocation.env(key.as_str(), value.as_str());
                }
                info!(task = ctx.task_name, command = %invocation, "exec");
                ctx.exec(invocation)?;
            }
            Step::Print(message) => println!("{}", message),
            Step::Copy {
                from,
                into,
                exclude,
            } => {
                let copied = files::copy_tree(&ctx.resolve(from), &ctx.resolve(into), exclude)?;
                info!(task = ctx.task_name, from, into, copied, "copied files");
            }
            Step::DeleteMatching { roots, pattern } => {
                let deleted = files::delete_matching(ctx.working_dir, roots, pattern)?;
                info!(task = ctx.task_name, deleted = deleted.len(), "deleted matching files");
            }
        }
        Ok(())
    }
}

/// The ordered steps of a configured task. An empty list makes an aggregate task.
#[derive(Debug, Clone, Default)]
pub struct Steps(pub Vec<Step>);

impl Steps {
    pub fn from_config(configs: &[StepConfig], properties: &Properties) -> ChoreResult<Self> {
        configs
            .iter()
            .map(|config| Step::from_config(config, properties))
            .collect::<ChoreResult<Vec<_>>>()
            .map(Steps)
    }
}

impl TaskAction for Steps {
    fn run(&self, ctx: &ActionContext<'_>) -> ChoreResult<()> {
        for step in &self.0 {
            step.run(ctx)?;
        }
        Ok(())
    }
}
