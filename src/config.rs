//! Shell configuration: where the rule base comes from and how results are
//! presented.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::RuleBaseResult;
use crate::store::RuleStore;

/// Environment variable naming a rule-base file.
pub const RULES_ENV: &str = "RULECHAIN_RULES";

/// Origin of the rule base.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "path")]
pub enum RuleSource {
    /// The built-in health-assistant rules.
    #[default]
    Builtin,

    /// A JSON rule-definition file.
    File(PathBuf),
}

impl RuleSource {
    /// `File` when a path is given, `Builtin` otherwise.
    #[must_use]
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Builtin, Self::File)
    }

    /// Builds the rule store. The built-in source cannot fail.
    pub fn load(&self) -> RuleBaseResult<RuleStore> {
        let store = match self {
            Self::Builtin => RuleStore::health_assistant(),
            Self::File(path) => RuleStore::load(path)?,
        };
        info!(
            source = ?self,
            rules = store.len(),
            fingerprint = %store.fingerprint(),
            "rule base ready"
        );
        Ok(store)
    }
}

/// Presentation format for shell output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// One JSON document per command.
    Json,
}

/// Settings shared by every shell command.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Rule base origin.
    pub rules: RuleSource,

    /// Output format.
    pub format: OutputFormat,

    /// Indent proof narration by recursion depth.
    pub indent_proofs: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_builtin_text_output() {
        let config = ShellConfig::default();
        assert_eq!(config.rules, RuleSource::Builtin);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(!config.indent_proofs);
    }

    #[test]
    fn from_path_selects_file_source() {
        assert_eq!(RuleSource::from_path(None), RuleSource::Builtin);
        assert_eq!(
            RuleSource::from_path(Some(PathBuf::from("rules.json"))),
            RuleSource::File(PathBuf::from("rules.json"))
        );
    }

    #[test]
    fn builtin_source_loads() {
        let store = RuleSource::Builtin.load().unwrap();
        assert_eq!(store.len(), 10);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = RuleSource::File(PathBuf::from("/definitely/not/here.json"))
            .load()
            .unwrap_err();
        assert!(!err.is_definition_error());
    }
}
