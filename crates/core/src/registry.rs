//! Task registry
//!
//! Tasks are registered once, keyed by their unique name, and are immutable afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::actions::TaskAction;
use crate::types::{ChoreError, ChoreResult};

pub struct Task {
    name: String,
    group: Option<String>,
    description: Option<String>,
    dependencies: Vec<String>,
    working_dir: Option<PathBuf>,
    action: Box<dyn TaskAction>,
}

impl Task {
    pub fn new(name: impl Into<String>, action: impl TaskAction + 'static) -> Self {
        Self {
            name: name.into(),
            group: None,
            description: None,
            dependencies: Vec::new(),
            working_dir: None,
            action: Box::new(action),
        }
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Dependency names in declaration order
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn action(&self) -> &dyn TaskAction {
        self.action.as_ref()
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("dependencies", &self.dependencies)
            .field("working_dir", &self.working_dir)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: BTreeMap<String, Task>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task. Fails if a task with the same name already exists.
    pub fn register(&mut self, task: Task) -> ChoreResult<()> {
        if self.tasks.contains_key(task.name()) {
            return Err(ChoreError::DuplicateTask(task.name));
        }
        self.tasks.insert(task.name.clone(), task);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> ChoreResult<&Task> {
        self.tasks
            .get(name)
            .ok_or_else(|| ChoreError::unknown_task(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// All tasks in name order
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Tasks bucketed by group label, groups and tasks in name order.
    /// Ungrouped tasks come last under `None`.
    pub fn grouped(&self) -> Vec<(Option<&str>, Vec<&Task>)> {
        let mut groups: BTreeMap<&str, Vec<&Task>> = BTreeMap::new();
        let mut ungrouped = Vec::new();

        for task in self.iter() {
            match task.group() {
                Some(group) => groups.entry(group).or_default().push(task),
                None => ungrouped.push(task),
            }
        }

        let mut result: Vec<(Option<&str>, Vec<&Task>)> = groups
            .into_iter()
            .map(|(group, tasks)| (Some(group), tasks))
            .collect();
        if !ungrouped.is_empty() {
            result.push((None, ungrouped));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Steps;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = TaskRegistry::new();
        registry
            .register(
                Task::new("generateProto", Steps::default())
                    .with_group("build")
                    .with_description("Generate protobuf stubs"),
            )
            .unwrap();

        let task = registry.lookup("generateProto").unwrap();
        assert_eq!(task.group(), Some("build"));
        assert_eq!(task.description(), Some("Generate protobuf stubs"));
        assert!(task.dependencies().is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = TaskRegistry::new();
        registry.register(Task::new("pubGet", Steps::default())).unwrap();
        let err = registry
            .register(Task::new("pubGet", Steps::default()))
            .unwrap_err();
        assert!(matches!(err, ChoreError::DuplicateTask(name) if name == "pubGet"));
    }

    #[test]
    fn test_lookup_unknown_task() {
        let registry = TaskRegistry::new();
        let err = registry.lookup("missing").unwrap_err();
        assert!(matches!(err, ChoreError::UnknownTask { name, required_by: None } if name == "missing"));
    }

    #[test]
    fn test_grouped_listing() {
        let mut registry = TaskRegistry::new();
        registry
            .register(Task::new("test", Steps::default()).with_group("verification"))
            .unwrap();
        registry
            .register(Task::new("pubGet", Steps::default()).with_group("build"))
            .unwrap();
        registry
            .register(Task::new("analyze", Steps::default()).with_group("verification"))
            .unwrap();
        registry.register(Task::new("printPath", Steps::default())).unwrap();

        let grouped = registry.grouped();
        let summary: Vec<(Option<&str>, Vec<&str>)> = grouped
            .iter()
            .map(|(group, tasks)| (*group, tasks.iter().map(|t| t.name()).collect()))
            .collect();

        assert_eq!(
            summary,
            vec![
                (Some("build"), vec!["pubGet"]),
                (Some("verification"), vec!["analyze", "test"]),
                (None, vec!["printPath"]),
            ]
        );
    }
}
