//! Chore Core Library
//!
//! This is the core library for the chore task runner. It provides task registration,
//! dependency resolution into execution plans, and sequential fail-fast execution of
//! tasks that shell out to external tools.
//!
//! ## Architecture
//!
//! The core library is organized into several modules:
//!
//! - [`workspace_manager`] - High-level workspace interface used by the CLI
//! - [`workspace`] - Task file loading, task registration and the task graph
//! - [`registry`] - The task registry
//! - [`execution`] - Process invocation, dependency resolution and the task runner
//! - [`actions`] - Task actions and the built-in steps
//! - [`configs`] - Task file parsing
//! - [`properties`] - `${name}` substitution of configuration values
//! - [`tasks`] - Terminal color management
//! - [`results`] - Result types for workspace operations
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! Tasks can be registered programmatically and run against any [`ProcessInvoker`]:
//!
//! ```rust,no_run
//! use chore_core::actions::ActionContext;
//! use chore_core::execution::{resolve_execution_plan, CommandExecutor, Invocation, TaskRunner};
//! use chore_core::registry::{Task, TaskRegistry};
//! use chore_core::types::ChoreResult;
//!
//! fn pub_get(ctx: &ActionContext<'_>) -> ChoreResult<()> {
//!     ctx.exec(Invocation::new("flutter").args(["pub", "get"]))?;
//!     Ok(())
//! }
//!
//! # fn example() -> ChoreResult<()> {
//! let mut registry = TaskRegistry::new();
//! registry.register(Task::new("pubGet", pub_get).with_group("build"))?;
//!
//! let plan = resolve_execution_plan(&registry, &["pubGet".to_string()])?;
//! let result = TaskRunner::new(&registry, &CommandExecutor::default()).execute(&plan);
//! assert!(result.is_success());
//! # Ok(())
//! # }
//! ```
//!
//! [`ProcessInvoker`]: execution::ProcessInvoker

pub mod actions;
pub mod configs;
pub mod execution;
pub mod properties;
pub mod registry;
pub mod results;
pub mod tasks;
pub mod types;
pub mod workspace;
pub mod workspace_manager;

// Re-export the main types for easier usage
pub use types::{ChoreError, ChoreResult};
pub use workspace_manager::{WorkspaceManager, WorkspaceManagerConfig};
