use std::process::ExitCode;

use anyhow::{Context, Result};
use chore_core::execution::ExecutionPlan;
use chore_core::tasks::get_task_color;
use chore_core::workspace_manager::WorkspaceManager;
use colored::*;

pub fn execute(manager: &WorkspaceManager, targets: &[String]) -> Result<ExitCode> {
    let execution_plan = manager
        .get_execution_plan(targets)
        .context("Failed to get execution plan")?;

    print_plan(&execution_plan);
    Ok(ExitCode::SUCCESS)
}

pub fn print_plan(plan: &ExecutionPlan) {
    println!(
        "{} {}",
        "Execution plan for".bold(),
        plan.roots().join(", ").cyan()
    );

    println!("\n{}:", "Execution order".bold());
    for (i, task) in plan.tasks().iter().enumerate() {
        let marker = if plan.roots().contains(task) {
            ""
        } else {
            " (dependency)"
        };
        println!(
            "  {}. {}{}",
            i + 1,
            task.color(get_task_color(task)),
            marker.dimmed()
        );
    }
}
