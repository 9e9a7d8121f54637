use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single task declaration inside a task file
#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskConfig {
    pub name: String,
    /// Group label shown by `chore list`. Tasks without a group are only listed with `--all`.
    pub group: Option<String>,
    pub description: Option<String>,
    /// Tasks that must run before this one. Bare names inside a project refer to
    /// tasks of the same project, `project:task` is absolute and `:task` names a root task.
    pub depends_on: Option<Vec<String>>,
    /// Working directory for every step, relative to the file declaring the task.
    pub working_dir: Option<String>,
    pub steps: Option<Vec<StepConfig>>,
}

/// One unit of work inside a task, executed in declaration order
#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub enum StepConfig {
    Exec(ExecStepConfig),
    Print(String),
    Copy(CopyStepConfig),
    DeleteMatching(DeleteMatchingStepConfig),
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExecStepConfig {
    pub executable: String,
    pub args: Option<Vec<String>>,
    pub working_dir: Option<String>,
    pub env: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CopyStepConfig {
    pub from: String,
    pub into: String,
    /// Glob patterns relative to `from`. A matching directory is skipped entirely.
    pub exclude: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeleteMatchingStepConfig {
    pub roots: Vec<String>,
    /// Regular expression matched against the whole `root/relative/path`.
    pub pattern: String,
}
