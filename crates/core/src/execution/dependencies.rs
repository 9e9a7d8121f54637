//! Task dependency resolution
//!
//! Turns requested task names into an [`ExecutionPlan`]: a depth-first, dependencies-first
//! ordering in which every reachable task appears exactly once.

use std::collections::HashSet;

use tracing::debug;

use crate::registry::TaskRegistry;
use crate::types::{ChoreError, ChoreResult};

/// Ordered task names, each dependency before every task that declares it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    roots: Vec<String>,
    tasks: Vec<String>,
}

impl ExecutionPlan {
    /// The task names that were requested
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task == name)
    }
}

struct Planner<'a> {
    registry: &'a TaskRegistry,
    planned: HashSet<String>,
    order: Vec<String>,
    stack: Vec<String>,
}

impl Planner<'_> {
    fn visit(&mut self, name: &str, required_by: Option<&str>) -> ChoreResult<()> {
        if self.planned.contains(name) {
            return Ok(());
        }

        if let Some(start) = self.stack.iter().position(|entry| entry == name) {
            let mut cycle = self.stack[start..].to_vec();
            cycle.push(name.to_string());
            return Err(ChoreError::CyclicDependency(cycle));
        }

        let registry = self.registry;
        let task = registry.lookup(name).map_err(|_| ChoreError::UnknownTask {
            name: name.to_string(),
            required_by: required_by.map(str::to_string),
        })?;

        self.stack.push(name.to_string());
        for dependency in task.dependencies() {
            self.visit(dependency, Some(name))?;
        }
        self.stack.pop();

        debug!(task = name, position = self.order.len(), "planned");
        self.planned.insert(name.to_string());
        self.order.push(name.to_string());
        Ok(())
    }
}

/// Resolve `roots`, in the given order, into an execution plan.
///
/// Fails with [`ChoreError::UnknownTask`] when a root or any transitive dependency is
/// not registered and with [`ChoreError::CyclicDependency`] when a task depends on
/// itself through its dependencies. Nothing is executed here.
pub fn resolve_execution_plan(
    registry: &TaskRegistry,
    roots: &[String],
) -> ChoreResult<ExecutionPlan> {
    if roots.is_empty() {
        return Err(ChoreError::Config("No tasks requested".to_string()));
    }

    let mut planner = Planner {
        registry,
        planned: HashSet::new(),
        order: Vec::new(),
        stack: Vec::new(),
    };

    for root in roots {
        planner.visit(root, None)?;
    }

    Ok(ExecutionPlan {
        roots: roots.to_vec(),
        tasks: planner.order,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Steps;
    use crate::registry::Task;

    fn registry(tasks: &[(&str, &[&str])]) -> TaskRegistry {
        let mut registry = TaskRegistry::new();
        for (name, deps) in tasks {
            registry
                .register(Task::new(*name, Steps::default()).with_dependencies(deps.iter().copied()))
                .unwrap();
        }
        registry
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_diamond_runs_shared_dependency_once() {
        let registry = registry(&[("A", &[]), ("B", &["A"]), ("C", &["A"]), ("D", &["B", "C"])]);
        let plan = resolve_execution_plan(&registry, &names(&["D"])).unwrap();
        assert_eq!(plan.tasks(), names(&["A", "B", "C", "D"]).as_slice());
    }

    #[test]
    fn test_every_dependency_precedes_its_dependents() {
        let registry = registry(&[
            ("generateCode", &["cleanFlutter", "pubGet"]),
            ("cleanFlutter", &[]),
            ("pubGet", &[]),
            ("analyze", &["generateCode"]),
            ("test", &["generateCode"]),
            ("precommit", &["analyze", "test"]),
        ]);
        let plan = resolve_execution_plan(&registry, &names(&["precommit"])).unwrap();

        assert_eq!(plan.len(), 6);
        for task in registry.iter() {
            let Some(position) = plan.position(task.name()) else {
                continue;
            };
            for dependency in task.dependencies() {
                assert!(plan.position(dependency).unwrap() < position);
            }
        }
        assert_eq!(plan.tasks().last().map(String::as_str), Some("precommit"));
    }

    #[test]
    fn test_multiple_roots_follow_request_order() {
        let registry = registry(&[("A", &[]), ("B", &[]), ("C", &["A"])]);
        let plan = resolve_execution_plan(&registry, &names(&["B", "C", "B"])).unwrap();
        assert_eq!(plan.tasks(), names(&["B", "A", "C"]).as_slice());
        assert_eq!(plan.roots(), names(&["B", "C", "B"]).as_slice());
    }

    #[test]
    fn test_cycle_is_reported_with_path() {
        let registry = registry(&[("X", &["Y"]), ("Y", &["X"])]);
        let err = resolve_execution_plan(&registry, &names(&["X"])).unwrap_err();
        match err {
            ChoreError::CyclicDependency(cycle) => assert_eq!(cycle, names(&["X", "Y", "X"])),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let registry = registry(&[("loop", &["loop"])]);
        let err = resolve_execution_plan(&registry, &names(&["loop"])).unwrap_err();
        assert_eq!(err.to_string(), "Circular dependency detected: loop -> loop");
    }

    #[test]
    fn test_cycle_below_root_excludes_unrelated_prefix() {
        let registry = registry(&[("root", &["X"]), ("X", &["Y"]), ("Y", &["Z"]), ("Z", &["X"])]);
        let err = resolve_execution_plan(&registry, &names(&["root"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Circular dependency detected: X -> Y -> Z -> X"
        );
    }

    #[test]
    fn test_unknown_root_and_dependency() {
        let registry = registry(&[("docker", &["copyDockerfileDependencies"])]);

        let err = resolve_execution_plan(&registry, &names(&["nope"])).unwrap_err();
        assert!(matches!(err, ChoreError::UnknownTask { ref name, required_by: None } if name == "nope"));

        let err = resolve_execution_plan(&registry, &names(&["docker"])).unwrap_err();
        match err {
            ChoreError::UnknownTask { name, required_by } => {
                assert_eq!(name, "copyDockerfileDependencies");
                assert_eq!(required_by.as_deref(), Some("docker"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_empty_request_is_rejected() {
        let registry = registry(&[("A", &[])]);
        assert!(matches!(
            resolve_execution_plan(&registry, &[]),
            Err(ChoreError::Config(_))
        ));
    }
}
