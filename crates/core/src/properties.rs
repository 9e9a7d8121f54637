//! Named configuration values substituted into task steps
//!
//! Values come from the root task file and from `-P name=value` overrides. They are
//! resolved once, while tasks are registered, so a missing value is reported before
//! anything runs.

use std::collections::BTreeMap;

use crate::types::{ChoreError, ChoreResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    values: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Layer `overrides` on top of these values
    pub fn merged_with(&self, overrides: &Properties) -> Properties {
        let mut merged = self.clone();
        for (name, value) in overrides.iter() {
            merged.set(name, value);
        }
        merged
    }

    /// Parse a `name=value` assignment as given on the command line
    pub fn parse_assignment(input: &str) -> ChoreResult<(String, String)> {
        match input.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                Ok((name.trim().to_string(), value.to_string()))
            }
            _ => Err(ChoreError::Config(format!(
                "Invalid property '{}', expected name=value",
                input
            ))),
        }
    }

    /// Replace every `${name}` in `input`. `$${` yields a literal `${`.
    pub fn interpolate(&self, input: &str) -> ChoreResult<String> {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            if let Some(after) = tail.strip_prefix("$${") {
                out.push_str("${");
                rest = after;
            } else if let Some(after) = tail.strip_prefix("${") {
                let end = after.find('}').ok_or_else(|| {
                    ChoreError::Config(format!("Unterminated property reference in '{}'", input))
                })?;
                let name = after[..end].trim();
                let value = self.get(name).ok_or_else(|| {
                    ChoreError::Config(format!("Undefined property '{}' in '{}'", name, input))
                })?;
                out.push_str(value);
                rest = &after[end + 1..];
            } else {
                out.push('$');
                rest = &tail[1..];
            }
        }

        out.push_str(rest);
        Ok(out)
    }
}

impl FromIterator<(String, String)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props() -> Properties {
        [
            ("repoRoot".to_string(), "apache".to_string()),
            ("prefix".to_string(), "beam_".to_string()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_interpolate_replaces_references() {
        let value = props()
            .interpolate("${repoRoot}/${prefix}playground-frontend")
            .unwrap();
        assert_eq!(value, "apache/beam_playground-frontend");
    }

    #[test]
    fn test_interpolate_leaves_plain_dollars() {
        assert_eq!(props().interpolate("cost: $5").unwrap(), "cost: $5");
        assert_eq!(props().interpolate(".*\\.g\\.dart$").unwrap(), ".*\\.g\\.dart$");
        assert_eq!(props().interpolate("$${HOME}").unwrap(), "${HOME}");
    }

    #[test]
    fn test_interpolate_undefined_property_fails() {
        let err = props().interpolate("${missing}").unwrap_err();
        assert!(err.to_string().contains("Undefined property 'missing'"));
        assert!(err.is_configuration_error());

        let err = props().interpolate("${repoRoot").unwrap_err();
        assert!(err.to_string().contains("Unterminated"));
    }

    #[test]
    fn test_overrides_win() {
        let mut overrides = Properties::new();
        overrides.set("repoRoot", "gcr.io/beam");
        let merged = props().merged_with(&overrides);
        assert_eq!(merged.get("repoRoot"), Some("gcr.io/beam"));
        assert_eq!(merged.get("prefix"), Some("beam_"));
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            Properties::parse_assignment("docker-repository-root=gcr.io/x=y").unwrap(),
            ("docker-repository-root".to_string(), "gcr.io/x=y".to_string())
        );
        assert!(Properties::parse_assignment("novalue").is_err());
        assert!(Properties::parse_assignment("=value").is_err());
    }
}
