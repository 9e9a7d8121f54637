use std::process::ExitCode;

use anyhow::{Context, Result};
use chore_core::execution::{CommandExecutor, ExecutionResult, OutputMode, TaskState};
use chore_core::workspace_manager::WorkspaceManager;
use colored::*;

use crate::commands::plan::print_plan;
use crate::EXIT_TASK_FAILURE;

pub fn execute(manager: &WorkspaceManager, targets: &[String], dry_run: bool) -> Result<ExitCode> {
    // Resolve everything up front so configuration errors surface before any task runs
    let plan = manager
        .get_execution_plan(targets)
        .context("Failed to get execution plan")?;

    if dry_run {
        print_plan(&plan);
        return Ok(ExitCode::SUCCESS);
    }

    let invoker = CommandExecutor::new(OutputMode::Inherit);
    let result = manager.run_plan(&plan, &invoker);
    print_summary(&result);

    Ok(ExitCode::from(exit_code(&result)))
}

/// Exit code for a finished run
pub fn exit_code(result: &ExecutionResult) -> u8 {
    if result.is_success() {
        0
    } else {
        EXIT_TASK_FAILURE
    }
}

fn print_summary(result: &ExecutionResult) {
    println!();
    for outcome in result.outcomes() {
        let status = match &outcome.state {
            TaskState::Succeeded => "✓".green().bold(),
            TaskState::Failed(_) => "✗".red().bold(),
            TaskState::Skipped => "-".bright_black(),
            TaskState::Pending | TaskState::Running => "?".yellow(),
        };
        let elapsed = outcome
            .duration
            .map(|d| format!(" ({:.1}s)", d.as_secs_f64()))
            .unwrap_or_default();
        println!(
            "{} {} {}{}",
            status,
            outcome.name,
            outcome.state.label().dimmed(),
            elapsed.dimmed()
        );
    }

    println!();
    match result.failure() {
        Some((task, err)) => {
            let skipped = result.count(|s| matches!(s, TaskState::Skipped));
            eprintln!(
                "{} task '{}' failed: {}",
                "BUILD FAILED:".red().bold(),
                task,
                err
            );
            if skipped > 0 {
                eprintln!("{} {} task(s) skipped", "note:".yellow(), skipped);
            }
        }
        None => println!(
            "{} {} task(s) in {:.1}s",
            "BUILD SUCCESSFUL:".green().bold(),
            result.outcomes().len(),
            result.total_duration().as_secs_f64()
        ),
    }
}
