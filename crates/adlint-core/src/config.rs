//! Linter configuration.
//!
//! Configuration is TOML. Rule entries accept either a bare severity
//! string or a table with `severity` and rule-specific `options`:
//!
//! ```toml
//! allow-inline-config = true
//!
//! [rules]
//! duplicated-hints = "error"
//! min-rule-length = { severity = "warn", options = { min = 4 } }
//! ```

use crate::types::Severity;
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Errors raised while loading or resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file `{path}`: {source}")]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A rule rejected its configured options.
    #[error("invalid options for rule `{rule}`: {reason}")]
    InvalidOptions {
        /// The rule whose options failed validation.
        rule: String,
        /// The validator's message.
        reason: String,
    },
}

/// How a single rule is configured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSetting {
    /// Effective severity, `off` disables the rule.
    pub severity: Severity,
    /// Rule-specific options; `None` falls back to the rule's defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<toml::Value>,
}

impl RuleSetting {
    /// A setting with the given severity and default options.
    #[must_use]
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            options: None,
        }
    }

    /// Attaches rule-specific options.
    #[must_use]
    pub fn with_options(mut self, options: toml::Value) -> Self {
        self.options = Some(options);
        self
    }
}

impl<'de> Deserialize<'de> for RuleSetting {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Table {
            severity: Severity,
            #[serde(default)]
            options: Option<toml::Value>,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bare(Severity),
            Full(Table),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Bare(severity) => Self {
                severity,
                options: None,
            },
            Raw::Full(t) => Self {
                severity: t.severity,
                options: t.options,
            },
        })
    }
}

/// Top-level linter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LinterConfig {
    /// Whether inline directive comments may toggle rules. When false,
    /// directive comments are linted like any other comment.
    pub allow_inline_config: bool,

    /// Syntax dialects the parsed lists target. Informational for rules
    /// that vary their checks by dialect.
    pub syntax: Vec<String>,

    /// Rule settings keyed by rule name. A `BTreeMap` keeps resolution
    /// order (and therefore report order) deterministic.
    pub rules: BTreeMap<String, RuleSetting>,
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            allow_inline_config: true,
            syntax: vec!["common".to_string()],
            rules: BTreeMap::new(),
        }
    }
}

impl LinterConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] on malformed TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Sets a rule's severity, keeping any existing options.
    pub fn set_rule(&mut self, name: impl Into<String>, setting: RuleSetting) {
        self.rules.insert(name.into(), setting);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = LinterConfig::default();
        assert!(config.allow_inline_config);
        assert_eq!(config.syntax, vec!["common"]);
        assert!(config.rules.is_empty());
    }

    #[test]
    fn parse_bare_severity() {
        let config = LinterConfig::parse(
            r#"
            [rules]
            duplicated-hints = "error"
            unknown-hints = "off"
            "#,
        )
        .unwrap();
        assert_eq!(config.rules["duplicated-hints"].severity, Severity::Error);
        assert_eq!(config.rules["unknown-hints"].severity, Severity::Off);
        assert!(config.rules["duplicated-hints"].options.is_none());
    }

    #[test]
    fn parse_table_with_options() {
        let config = LinterConfig::parse(
            r#"
            allow-inline-config = false

            [rules]
            min-rule-length = { severity = "warn", options = { min = 4 } }
            "#,
        )
        .unwrap();
        assert!(!config.allow_inline_config);
        let setting = &config.rules["min-rule-length"];
        assert_eq!(setting.severity, Severity::Warn);
        let min = setting
            .options
            .as_ref()
            .and_then(|o| o.get("min"))
            .and_then(toml::Value::as_integer);
        assert_eq!(min, Some(4));
    }

    #[test]
    fn parse_rejects_bad_severity() {
        let err = LinterConfig::parse(
            r#"
            [rules]
            some-rule = "loud"
            "#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn roundtrip_serialization() {
        let mut config = LinterConfig::default();
        config.set_rule(
            "min-rule-length",
            RuleSetting::new(Severity::Warn).with_options(toml::Value::Table({
                let mut t = toml::map::Map::new();
                t.insert("min".to_string(), toml::Value::Integer(4));
                t
            })),
        );
        let text = toml::to_string(&config).unwrap();
        let back = LinterConfig::parse(&text).unwrap();
        assert_eq!(back.rules["min-rule-length"].severity, Severity::Warn);
    }
}
