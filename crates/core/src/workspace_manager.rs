//! High-level workspace management interface
//!
//! This module provides the [`WorkspaceManager`] which serves as the primary interface
//! for all workspace operations. It encapsulates loading task files, registering tasks,
//! planning and running them.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chore_core::execution::{CommandExecutor, OutputMode};
//! use chore_core::properties::Properties;
//! use chore_core::workspace_manager::{WorkspaceManager, WorkspaceManagerConfig};
//! use std::path::PathBuf;
//!
//! # fn example() -> chore_core::types::ChoreResult<()> {
//! let manager = WorkspaceManager::new(WorkspaceManagerConfig {
//!     workspace_root: PathBuf::from("."),
//!     config_file: None,
//!     properties: Properties::new(),
//! })?;
//!
//! // Show what `precommit` would run
//! let plan = manager.get_execution_plan(&["precommit".to_string()])?;
//!
//! // Run it
//! let result = manager.run_plan(&plan, &CommandExecutor::new(OutputMode::Inherit));
//! assert!(result.is_success());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use crate::execution::command::ProcessInvoker;
use crate::execution::dependencies::{resolve_execution_plan, ExecutionPlan};
use crate::execution::runner::{ExecutionResult, TaskRunner, TaskRunnerConfig};
use crate::properties::Properties;
use crate::registry::TaskRegistry;
use crate::results::{TaskGraphResult, TaskGroupInfo, TaskInfo, TaskListResult};
use crate::types::ChoreResult;
use crate::workspace::{build_registry, build_task_graph, expand_target, load_workspace, Workspace};

/// High-level workspace manager that encapsulates all workspace operations
pub struct WorkspaceManager {
    pub workspace: Workspace,
    pub registry: TaskRegistry,
}

/// Configuration for initializing a workspace manager
#[derive(Debug, Clone)]
pub struct WorkspaceManagerConfig {
    pub workspace_root: PathBuf,
    /// Explicit task file; probed in `workspace_root` when `None`
    pub config_file: Option<PathBuf>,
    /// Command-line property overrides
    pub properties: Properties,
}

impl WorkspaceManager {
    /// Load the workspace and register all of its tasks
    pub fn new(config: WorkspaceManagerConfig) -> ChoreResult<Self> {
        let workspace = load_workspace(
            &config.workspace_root,
            config.config_file.as_deref(),
            &config.properties,
        )?;
        let registry = build_registry(&workspace)?;

        Ok(Self {
            workspace,
            registry,
        })
    }

    /// List tasks by group. Ungrouped tasks are only included when asked for.
    pub fn list_tasks(&self, include_ungrouped: bool) -> TaskListResult {
        let mut hidden = 0;
        let groups = self
            .registry
            .grouped()
            .into_iter()
            .filter_map(|(group, tasks)| {
                if group.is_none() && !include_ungrouped {
                    hidden += tasks.len();
                    return None;
                }
                Some(TaskGroupInfo {
                    name: group.map(str::to_string),
                    tasks: tasks.into_iter().map(TaskInfo::from).collect(),
                })
            })
            .collect();

        TaskListResult {
            workspace_name: self.workspace.config.name.clone(),
            groups,
            hidden,
        }
    }

    /// Resolve targets into a validated execution plan without running anything
    pub fn get_execution_plan(&self, targets: &[String]) -> ChoreResult<ExecutionPlan> {
        let mut roots = Vec::new();
        for target in targets {
            roots.extend(expand_target(&self.registry, &self.workspace, target)?);
        }
        resolve_execution_plan(&self.registry, &roots)
    }

    /// Execute a previously resolved plan
    pub fn run_plan(&self, plan: &ExecutionPlan, invoker: &dyn ProcessInvoker) -> ExecutionResult {
        TaskRunner::new(&self.registry, invoker)
            .with_config(TaskRunnerConfig {
                default_working_dir: self.workspace.root.clone(),
                ..TaskRunnerConfig::default()
            })
            .execute(plan)
    }

    /// Plan and run `targets`. Planning errors are returned before anything runs;
    /// task failures are reported in the [`ExecutionResult`].
    pub fn run_tasks(
        &self,
        targets: &[String],
        invoker: &dyn ProcessInvoker,
    ) -> ChoreResult<ExecutionResult> {
        let plan = self.get_execution_plan(targets)?;
        Ok(self.run_plan(&plan, invoker))
    }

    /// Get dependency graph information
    pub fn get_task_graph(&self) -> TaskGraphResult {
        build_task_graph(&self.registry)
    }
}
