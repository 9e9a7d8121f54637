use thiserror::Error;

/// The main error type for chore operations
#[derive(Debug, Error)]
pub enum ChoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Task '{0}' is already registered")]
    DuplicateTask(String),

    #[error("{}", unknown_task_message(.name, .required_by.as_deref()))]
    UnknownTask {
        name: String,
        required_by: Option<String>,
    },

    #[error("Circular dependency detected: {}", .0.join(" -> "))]
    CyclicDependency(Vec<String>),

    #[error("Failed to launch '{program}': {source}")]
    ProcessLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{}", exit_message(.program, .code))]
    ProcessExecution { program: String, code: Option<i32> },

    #[error("Action error: {0}")]
    Action(String),
}

impl ChoreError {
    /// Whether this error is detected before any task action runs.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ChoreError::Io(_)
                | ChoreError::Yaml(_)
                | ChoreError::Toml(_)
                | ChoreError::Config(_)
                | ChoreError::DuplicateTask(_)
                | ChoreError::UnknownTask { .. }
                | ChoreError::CyclicDependency(_)
        )
    }

    pub fn unknown_task(name: impl Into<String>) -> Self {
        ChoreError::UnknownTask {
            name: name.into(),
            required_by: None,
        }
    }
}

fn unknown_task_message(name: &str, required_by: Option<&str>) -> String {
    match required_by {
        Some(parent) => format!("Task '{}' not found (required by '{}')", name, parent),
        None => format!("Task '{}' not found", name),
    }
}

fn exit_message(program: &str, code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("Command '{}' failed with exit code {}", program, code),
        None => format!("Command '{}' was terminated by a signal", program),
    }
}

/// Result type alias for chore operations
pub type ChoreResult<T> = Result<T, ChoreError>;
