//! Result types for workspace operations
//!
//! This module contains the result types returned by workspace manager operations,
//! keeping presentation data in one place for the CLI.

use petgraph::graph::DiGraph;

use crate::registry::Task;

/// Information about a registered task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInfo {
    pub name: String,
    pub group: Option<String>,
    pub description: Option<String>,
    pub dependencies: Vec<String>,
}

/// Tasks sharing a group label; `name` is `None` for ungrouped tasks
#[derive(Debug, Clone)]
pub struct TaskGroupInfo {
    pub name: Option<String>,
    pub tasks: Vec<TaskInfo>,
}

/// Result of listing tasks in the workspace
#[derive(Debug)]
pub struct TaskListResult {
    pub workspace_name: Option<String>,
    pub groups: Vec<TaskGroupInfo>,
    /// Number of ungrouped tasks left out of `groups`
    pub hidden: usize,
}

/// Whole-registry dependency graph with every cycle it contains
#[derive(Debug)]
pub struct TaskGraphResult {
    /// Edges point from a task to its dependencies
    pub graph: DiGraph<String, ()>,
    pub cycles: Vec<Vec<String>>,
    /// `(task, dependency)` pairs whose dependency is not registered
    pub missing: Vec<(String, String)>,
}

impl From<&Task> for TaskInfo {
    fn from(task: &Task) -> Self {
        Self {
            name: task.name().to_string(),
            group: task.group().map(str::to_string),
            description: task.description().map(str::to_string),
            dependencies: task.dependencies().to_vec(),
        }
    }
}

impl TaskGraphResult {
    /// Each cycle as a closed path, `a -> b -> a`
    pub fn cycle_paths(&self) -> Vec<String> {
        self.cycles
            .iter()
            .map(|cycle| {
                let closing = cycle.first().into_iter();
                cycle.iter().chain(closing).cloned().collect::<Vec<_>>().join(" -> ")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_paths_close_the_loop() {
        let result = TaskGraphResult {
            graph: DiGraph::new(),
            cycles: vec![
                vec!["X".to_string(), "Y".to_string()],
                vec!["lint".to_string()],
            ],
            missing: Vec::new(),
        };
        assert_eq!(result.cycle_paths(), vec!["X -> Y -> X", "lint -> lint"]);
    }
}
