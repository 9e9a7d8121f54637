use std::process::ExitCode;

use anyhow::Result;
use chore_core::tasks::get_task_color;
use chore_core::workspace_manager::WorkspaceManager;
use colored::*;

pub fn execute(manager: &WorkspaceManager) -> Result<ExitCode> {
    println!("{}", "Task Dependency Graph:".bold().underline());

    let result = manager.get_task_graph();
    let graph = &result.graph;

    let cycle_paths = result.cycle_paths();
    if !cycle_paths.is_empty() {
        println!(
            "{} {}",
            "Warning:".yellow().bold(),
            format!("Circular dependencies detected: {}", cycle_paths.join("; ")).yellow()
        );
    }

    for (task, dependency) in &result.missing {
        println!(
            "{} {}",
            "Warning:".yellow().bold(),
            format!("'{}' depends on unknown task '{}'", task, dependency).yellow()
        );
    }

    for node_index in graph.node_indices() {
        let name = &graph[node_index];
        println!("{}", name.color(get_task_color(name)).bold());

        // petgraph yields neighbors newest edge first; restore declaration order
        let mut deps: Vec<&str> = graph
            .neighbors(node_index)
            .map(|neighbor| graph[neighbor].as_str())
            .collect();
        deps.reverse();

        if !deps.is_empty() {
            println!("  {} {}", "depends on:".dimmed(), deps.join(", "));
        } else {
            println!("  {}", "no dependencies".dimmed());
        }
        println!();
    }

    Ok(ExitCode::SUCCESS)
}
