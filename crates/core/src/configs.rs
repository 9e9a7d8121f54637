//! Task file parsing
//!
//! Task files are YAML by default; a `.toml` extension selects TOML. Both formats
//! deserialize into the same structures.

pub mod project;
pub mod tasks;
pub mod workspace;

use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use crate::types::{ChoreError, ChoreResult};

/// File names probed, in order, when no task file is given explicitly
pub const CONFIG_FILE_NAMES: [&str; 3] = ["chore.yml", "chore.yaml", "chore.toml"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

pub fn parse_config<T: DeserializeOwned>(content: &str, format: ConfigFormat) -> ChoreResult<T> {
    let config = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    };
    Ok(config)
}

/// Locate the task file inside `dir`
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Read and parse a task file, choosing the format from its extension
pub fn load_config_file<T: DeserializeOwned>(path: &Path) -> ChoreResult<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ChoreError::Config(format!("Failed to read task file {}: {}", path.display(), e))
    })?;

    parse_config(&content, ConfigFormat::from_path(path)).map_err(|e| {
        ChoreError::Config(format!("Failed to parse task file {}: {}", path.display(), e))
    })
}

/// JSON schema describing a task file, for editor integration
pub fn json_schema<T: JsonSchema>() -> schemars::Schema {
    schemars::schema_for!(T)
}

#[cfg(test)]
mod tests {
    use super::tasks::StepConfig;
    use super::workspace::WorkspaceConfig;
    use super::*;

    #[test]
    fn test_parse_yaml_steps() {
        let yaml = r#"
name: playground
properties:
  composeFile: docker-compose.local.yml
tasks:
  - name: lintProto
    group: build
    steps:
      - exec:
          executable: buf
          args: [lint, --path, api/]
  - name: cleanGenerated
    steps:
      - print: "Deleting:"
      - deleteMatching:
          roots: [lib, test]
          pattern: '.*\.g\.dart'
"#;
        let config: WorkspaceConfig = parse_config(yaml, ConfigFormat::Yaml).unwrap();
        let tasks = config.tasks.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].group.as_deref(), Some("build"));

        let steps = tasks[1].steps.as_ref().unwrap();
        assert!(matches!(&steps[0], StepConfig::Print(msg) if msg == "Deleting:"));
        assert!(matches!(&steps[1], StepConfig::DeleteMatching(step) if step.roots == ["lib", "test"]));
    }

    #[test]
    fn test_parse_toml_matches_yaml_shape() {
        let toml = r#"
name = "playground"

[[tasks]]
name = "generateProto"
group = "build"
steps = [{ exec = { executable = "buf", args = ["generate"] } }]
"#;
        let config: WorkspaceConfig = parse_config(toml, ConfigFormat::Toml).unwrap();
        let tasks = config.tasks.unwrap();
        match &tasks[0].steps.as_ref().unwrap()[0] {
            StepConfig::Exec(exec) => {
                assert_eq!(exec.executable, "buf");
                assert_eq!(exec.args.as_deref(), Some(&["generate".to_string()][..]));
            }
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let yaml = "tasks:\n  - name: a\n    dependsOnn: [b]\n";
        let result: ChoreResult<WorkspaceConfig> = parse_config(yaml, ConfigFormat::Yaml);
        assert!(matches!(result, Err(ChoreError::Yaml(_))));
    }

    #[test]
    fn test_schema_uses_file_field_names() {
        let schema = serde_json::to_string(&json_schema::<WorkspaceConfig>()).unwrap();
        assert!(schema.contains("dependsOn"));
        assert!(schema.contains("deleteMatching"));
    }

    #[test]
    fn test_find_config_file_prefers_yaml() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(find_config_file(temp_dir.path()).is_none());

        std::fs::write(temp_dir.path().join("chore.toml"), "").unwrap();
        std::fs::write(temp_dir.path().join("chore.yml"), "").unwrap();
        assert_eq!(
            find_config_file(temp_dir.path()),
            Some(temp_dir.path().join("chore.yml"))
        );
    }
}
