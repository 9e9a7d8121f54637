//! Task execution module
//!
//! This module handles process invocation, dependency resolution into execution plans,
//! and sequential plan execution with result reporting.

pub mod command;
pub mod dependencies;
pub mod runner;

pub use command::{CommandExecutor, Invocation, OutputMode, ProcessInvoker, ProcessOutput};
pub use dependencies::{resolve_execution_plan, ExecutionPlan};
pub use runner::{ExecutionResult, TaskOutcome, TaskRunner, TaskRunnerConfig, TaskState};
