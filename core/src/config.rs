//! File-based help configuration.
//!
//! A [`HelpConfig`] declares how help output looks without recompiling:
//! the process-wide layout, per-command overrides, category descriptions
//! and extra universal flags. Files ending in `.json` are read as JSON,
//! everything else as YAML.
//!
//! # Example YAML
//!
//! ```yaml
//! default_layout:
//!   width: 90
//!   options_heading: Flags
//! commands:
//!   tsv:get_columns:
//!     sections:
//!       - kind: usage
//!       - kind: options
//!       - kind: custom
//!         heading: Notes
//!         lines: ["Column lists accept ranges such as 2-4."]
//! categories:
//!   tsv: Tools for tab-separated values.
//! universal_options:
//!   - short: -q
//!     long: --quiet
//!     description: Suppress diagnostics
//! ```

use std::collections::BTreeMap;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::{CommandRepository, HelpLayout, OptionSchema, validate_schema};

/// Help settings loaded from a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HelpConfig {
    /// Replaces the built-in layout for every command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_layout: Option<HelpLayout>,
    /// Layout overrides keyed by command name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub commands: BTreeMap<String, HelpLayout>,
    /// Descriptions printed under category headings in the command list.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub categories: BTreeMap<String, String>,
    /// Flags added to every command's schema.
    #[serde(skip_serializing_if = "OptionSchema::is_empty")]
    pub universal_options: OptionSchema,
}

impl HelpConfig {
    /// Loads configuration from a YAML or JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] or [`ConfigError::Json`] if parsing fails, and
    /// [`ConfigError::Validation`] if a universal flag is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config: HelpConfig = if is_json {
            serde_json::from_reader(reader)?
        } else {
            serde_yaml::from_reader(reader)?
        };
        config.validate()?;

        debug!(
            path = %path.display(),
            commands = config.commands.len(),
            categories = config.categories.len(),
            "Loaded help configuration"
        );
        Ok(config)
    }

    /// Checks the declared universal flags.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`](crate::ValidationError) found.
    pub fn validate(&self) -> Result<()> {
        match validate_schema(&self.universal_options).into_iter().next() {
            Some(err) => Err(ConfigError::Validation(err)),
            None => Ok(()),
        }
    }

    /// Applies every setting to `repo`.
    ///
    /// Universal flags that clash with an existing universal spelling are
    /// skipped.
    pub fn apply(&self, repo: &mut CommandRepository) {
        if let Some(layout) = &self.default_layout {
            repo.configure_default_help_layout(Some(layout.clone()));
        }
        for (name, layout) in &self.commands {
            repo.configure_command_help_layout(name, Some(layout.clone()));
        }
        for (category, text) in &self.categories {
            repo.describe_category(category, text);
        }
        for flag in &self.universal_options {
            if repo.universal_options().conflicts_with(flag) {
                debug!(flag = flag.canonical_name(), "Universal option already defined");
                continue;
            }
            repo.add_universal_option(flag.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::{CommandDefinition, FlagSchema, HelpSection, Invocation};

    fn sample_yaml() -> &'static str {
        r#"
default_layout:
  width: 90
  options_heading: Flags
commands:
  deploy:
    sections:
      - kind: description
      - kind: custom
        heading: Notes
        lines: ["Runs remotely."]
categories:
  ops: Operational commands.
universal_options:
  - short: -q
    long: --quiet
    description: Suppress diagnostics
"#
    }

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_yaml() {
        let file = write_temp(".yml", sample_yaml());
        let config = HelpConfig::load(file.path()).unwrap();

        assert_eq!(config.default_layout.as_ref().unwrap().width, Some(90));
        assert_eq!(
            config.commands["deploy"].effective_sections(),
            vec![
                HelpSection::description(),
                HelpSection::custom("Notes", ["Runs remotely."]),
            ]
        );
        assert_eq!(config.categories["ops"], "Operational commands.");
        assert!(config.universal_options.find("--quiet").is_some());
    }

    #[test]
    fn test_load_json_by_extension() {
        let json = r#"{"categories": {"tsv": "Tab tools."}, "default_layout": {"width": 70}}"#;
        let file = write_temp(".json", json);
        let config = HelpConfig::load(file.path()).unwrap();
        assert_eq!(config.categories["tsv"], "Tab tools.");
        assert_eq!(config.default_layout.unwrap().effective_width(), 70);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = HelpConfig::load(dir.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_malformed_yaml() {
        let file = write_temp(".yaml", "default_layout: 42\n");
        let err = HelpConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let file = write_temp(".json", r#"{"colour": "blue"}"#);
        assert!(matches!(
            HelpConfig::load(file.path()).unwrap_err(),
            ConfigError::Json(_)
        ));
    }

    #[test]
    fn test_load_rejects_bad_universal_flag() {
        let file = write_temp(".yml", "universal_options:\n  - short: q\n");
        let err = HelpConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_apply_configures_repository() {
        let config: HelpConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        let mut repo = CommandRepository::new();
        repo.register(
            CommandDefinition::new("deploy")
                .category("ops")
                .description("Deploy it."),
        )
        .unwrap();
        config.apply(&mut repo);

        assert_eq!(
            repo.render_command_help("deploy"),
            "Description:\n  Deploy it.\n\nNotes:\n  Runs remotely.\n\n"
        );
        assert!(repo
            .render_command_list("usage")
            .contains("## ops\n\nOperational commands.\n\n"));
        assert!(matches!(
            repo.parse(&["deploy".to_string(), "-q".to_string()]),
            Invocation::Parsed { .. }
        ));
    }

    #[test]
    fn test_apply_skips_clashing_universal_flag() {
        let config = HelpConfig {
            universal_options: OptionSchema::new()
                .with_flag(FlagSchema::boolean(Some("-h"), Some("--hush"))),
            ..HelpConfig::default()
        };
        let mut repo = CommandRepository::new();
        config.apply(&mut repo);
        assert_eq!(repo.universal_options().len(), 1);
    }
}
