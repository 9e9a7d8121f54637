use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::configs::tasks::TaskConfig;

/// Root task file of a workspace
#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorkspaceConfig {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Default values for `${name}` references. Overridden with `-P name=value`.
    pub properties: Option<BTreeMap<String, String>>,
    pub projects: Option<Vec<ProjectRef>>,
    pub tasks: Option<Vec<TaskConfig>>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectRef {
    /// Prefix for the project's tasks, e.g. `frontend` gives `frontend:test`.
    pub name: String,
    /// Directory holding the project's task file, relative to the workspace root.
    pub path: String,
}
