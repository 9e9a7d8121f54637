//! Workspace loading and task registration
//!
//! A workspace is a root task file plus any sub-projects it declares. Loading reads
//! every task file; registration turns the declarations into a [`TaskRegistry`],
//! qualifying project task names as `project:task`.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use petgraph::algo::kosaraju_scc;
use petgraph::graph::DiGraph;
use tracing::debug;

use crate::actions::Steps;
use crate::configs::project::ProjectConfig;
use crate::configs::tasks::TaskConfig;
use crate::configs::workspace::WorkspaceConfig;
use crate::configs::{find_config_file, load_config_file, CONFIG_FILE_NAMES};
use crate::properties::Properties;
use crate::registry::{Task, TaskRegistry};
use crate::results::TaskGraphResult;
use crate::types::{ChoreError, ChoreResult};

#[derive(Debug, Clone)]
pub struct Project {
    pub name: String,
    pub dir: PathBuf,
    pub config_path: PathBuf,
    pub config: ProjectConfig,
}

#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub config: WorkspaceConfig,
    pub projects: Vec<Project>,
    /// File defaults with command-line overrides applied
    pub properties: Properties,
}

/// Read the root task file and every project task file it references
pub fn load_workspace(
    root: &Path,
    config_file: Option<&Path>,
    overrides: &Properties,
) -> ChoreResult<Workspace> {
    let config_path = match config_file {
        Some(path) if path.is_relative() => root.join(path),
        Some(path) => path.to_path_buf(),
        None => find_config_file(root).ok_or_else(|| {
            ChoreError::Config(format!(
                "No task file found in {} (looked for {})",
                root.display(),
                CONFIG_FILE_NAMES.join(", ")
            ))
        })?,
    };
    debug!(path = %config_path.display(), "loading workspace task file");

    let config: WorkspaceConfig = load_config_file(&config_path)?;
    let defaults: Properties = config
        .properties
        .clone()
        .unwrap_or_default()
        .into_iter()
        .collect();
    let properties = defaults.merged_with(overrides);

    let mut projects = Vec::new();
    let mut seen = HashSet::new();
    for project_ref in config.projects.iter().flatten() {
        let name = project_ref.name.trim();
        if name.is_empty() {
            return Err(ChoreError::Config(format!(
                "Project at '{}' has an empty name",
                project_ref.path
            )));
        }
        if !seen.insert(name.to_string()) {
            return Err(ChoreError::Config(format!(
                "Project '{}' is declared more than once",
                name
            )));
        }

        let dir = root.join(&project_ref.path);
        let project_config_path = find_config_file(&dir).ok_or_else(|| {
            ChoreError::Config(format!(
                "Project '{}' has no task file in {}",
                name,
                dir.display()
            ))
        })?;
        debug!(project = name, path = %project_config_path.display(), "loading project task file");

        projects.push(Project {
            name: name.to_string(),
            config: load_config_file(&project_config_path)?,
            dir,
            config_path: project_config_path,
        });
    }

    Ok(Workspace {
        root: root.to_path_buf(),
        config_path,
        config,
        projects,
        properties,
    })
}

/// Turn a declared dependency into a registry name.
///
/// Inside a project, a bare name refers to a task of the same project. Names containing
/// `:` are absolute; a leading `:` addresses a root task.
pub fn qualify_dependency(project: Option<&str>, dependency: &str) -> String {
    if let Some(absolute) = dependency.strip_prefix(':') {
        return absolute.to_string();
    }
    match project {
        Some(project) if !dependency.contains(':') => format!("{}:{}", project, dependency),
        _ => dependency.to_string(),
    }
}

fn in_task(task: &str, err: ChoreError) -> ChoreError {
    match err {
        ChoreError::Config(message) => ChoreError::Config(format!("task '{}': {}", task, message)),
        other => other,
    }
}

fn register_task(
    registry: &mut TaskRegistry,
    project: Option<&str>,
    base_dir: &Path,
    config: &TaskConfig,
    properties: &Properties,
) -> ChoreResult<()> {
    if config.name.trim().is_empty() || config.name.contains(':') {
        return Err(ChoreError::Config(format!(
            "Invalid task name '{}': names must be non-empty and must not contain ':'",
            config.name
        )));
    }

    let name = match project {
        Some(project) => format!("{}:{}", project, config.name),
        None => config.name.clone(),
    };

    let working_dir = match &config.working_dir {
        Some(dir) => base_dir.join(properties.interpolate(dir).map_err(|e| in_task(&name, e))?),
        None => base_dir.to_path_buf(),
    };
    let steps = Steps::from_config(config.steps.as_deref().unwrap_or_default(), properties)
        .map_err(|e| in_task(&name, e))?;
    let dependencies: Vec<String> = config
        .depends_on
        .iter()
        .flatten()
        .map(|dependency| qualify_dependency(project, dependency))
        .collect();

    let mut task = Task::new(name, steps)
        .with_dependencies(dependencies)
        .with_working_dir(working_dir);
    if let Some(group) = &config.group {
        task = task.with_group(group.as_str());
    }
    if let Some(description) = &config.description {
        task = task.with_description(description.as_str());
    }

    registry.register(task)
}

/// Register every task declared in the workspace
pub fn build_registry(workspace: &Workspace) -> ChoreResult<TaskRegistry> {
    let mut registry = TaskRegistry::new();

    for task in workspace.config.tasks.iter().flatten() {
        register_task(
            &mut registry,
            None,
            &workspace.root,
            task,
            &workspace.properties,
        )?;
    }

    for project in &workspace.projects {
        for task in project.config.tasks.iter().flatten() {
            register_task(
                &mut registry,
                Some(&project.name),
                &project.dir,
                task,
                &workspace.properties,
            )?;
        }
    }

    debug!(tasks = registry.len(), "registered tasks");
    Ok(registry)
}

/// Map a requested target to registry names.
///
/// An exact registry name wins. A bare name that is not a root task selects that task
/// in every project that has it, in project declaration order. A leading `:` forces an
/// exact match.
pub fn expand_target(
    registry: &TaskRegistry,
    workspace: &Workspace,
    target: &str,
) -> ChoreResult<Vec<String>> {
    if let Some(exact) = target.strip_prefix(':') {
        return Ok(vec![exact.to_string()]);
    }
    if registry.contains(target) || target.contains(':') {
        return Ok(vec![target.to_string()]);
    }

    let matches: Vec<String> = workspace
        .projects
        .iter()
        .map(|project| format!("{}:{}", project.name, target))
        .filter(|name| registry.contains(name))
        .collect();

    if matches.is_empty() {
        return Err(ChoreError::unknown_task(target));
    }
    Ok(matches)
}

/// Build the dependency graph of every registered task
pub fn build_task_graph(registry: &TaskRegistry) -> TaskGraphResult {
    let mut graph = DiGraph::<String, ()>::new();
    let mut node_indices = HashMap::new();

    for task in registry.iter() {
        let node_index = graph.add_node(task.name().to_string());
        node_indices.insert(task.name().to_string(), node_index);
    }

    let mut missing = Vec::new();
    for task in registry.iter() {
        let from_node = node_indices[task.name()];
        for dependency in task.dependencies() {
            if let Some(&to_node) = node_indices.get(dependency) {
                graph.add_edge(from_node, to_node, ());
            } else {
                missing.push((task.name().to_string(), dependency.clone()));
            }
        }
    }

    // Strongly connected components of more than one node, or with a self edge, are cycles
    let mut cycles: Vec<Vec<String>> = kosaraju_scc(&graph)
        .into_iter()
        .filter_map(|component| {
            if component.len() > 1 {
                let mut cycle = component
                    .iter()
                    .map(|node| graph[*node].clone())
                    .collect::<Vec<_>>();
                cycle.sort();
                Some(cycle)
            } else {
                let node = component[0];
                if graph.contains_edge(node, node) {
                    Some(vec![graph[node].clone()])
                } else {
                    None
                }
            }
        })
        .collect();
    cycles.sort();

    TaskGraphResult {
        graph,
        cycles,
        missing,
    }
}
