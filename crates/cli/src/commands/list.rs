use std::process::ExitCode;

use anyhow::Result;
use chore_core::workspace_manager::WorkspaceManager;
use colored::*;

pub fn execute(manager: &WorkspaceManager, all: bool) -> Result<ExitCode> {
    let result = manager.list_tasks(all);

    let heading = match &result.workspace_name {
        Some(name) => format!("Tasks in {}", name),
        None => "Tasks".to_string(),
    };
    println!("{}", heading.bold().underline());

    if result.groups.is_empty() {
        println!("  {}", "No tasks found".dimmed());
    }

    for group in &result.groups {
        let title = match &group.name {
            Some(name) => format!("{} tasks", capitalize(name)),
            None => "Other tasks".to_string(),
        };
        println!();
        println!("{}", title.bold());
        println!("{}", "-".repeat(title.chars().count()).dimmed());

        for task in &group.tasks {
            match &task.description {
                Some(description) => println!("{} - {}", task.name.blue().bold(), description),
                None => println!("{}", task.name.blue().bold()),
            }
        }
    }

    if result.hidden > 0 {
        println!();
        println!(
            "{}",
            format!(
                "{} task(s) without a group hidden, use --all to show them",
                result.hidden
            )
            .dimmed()
        );
    }

    Ok(ExitCode::SUCCESS)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
