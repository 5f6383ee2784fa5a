//! Rule definitions and the rule registry.
//!
//! A [`RuleDefinition`] is an immutable value object: metadata plus a
//! mapping from selector text to visitor callbacks. Definitions are loaded
//! from a [`RuleRegistry`] once, ahead of dispatch, and shared behind
//! [`Arc`] for the whole run — the same loaded rule may serve concurrent
//! passes over different documents, so callbacks must be `Send + Sync` and
//! side-effect-free with respect to shared state.

use crate::config::{ConfigError, LinterConfig};
use crate::context::RuleContext;
use crate::types::{ProblemCategory, Severity};
use std::collections::HashMap;
use std::sync::Arc;

/// A visitor callback, invoked for each node its selector matches.
pub type VisitorFn = Arc<dyn Fn(&mut RuleContext<'_>) + Send + Sync>;

/// A document-start / document-end hook. Receives a context with no node.
pub type HookFn = Arc<dyn Fn(&mut RuleContext<'_>) + Send + Sync>;

/// Validates a rule's configured options. Runs once at configuration
/// resolution time, never per node.
pub type OptionsValidator = Arc<dyn Fn(&toml::Value) -> Result<(), String> + Send + Sync>;

/// An immutable lint rule definition.
pub struct RuleDefinition {
    name: String,
    category: ProblemCategory,
    description: String,
    default_severity: Severity,
    default_options: Option<toml::Value>,
    messages: HashMap<String, String>,
    visitors: Vec<(String, VisitorFn)>,
    on_start: Option<HookFn>,
    on_end: Option<HookFn>,
    options_validator: Option<OptionsValidator>,
}

impl RuleDefinition {
    /// Starts building a rule definition.
    #[must_use]
    pub fn builder(name: impl Into<String>, category: ProblemCategory) -> RuleDefinitionBuilder {
        RuleDefinitionBuilder {
            def: Self {
                name: name.into(),
                category,
                description: String::new(),
                default_severity: Severity::Error,
                default_options: None,
                messages: HashMap::new(),
                visitors: Vec::new(),
                on_start: None,
                on_end: None,
                options_validator: None,
            },
        }
    }

    /// The unique rule name (kebab-case).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The rule's category tag.
    #[must_use]
    pub fn category(&self) -> ProblemCategory {
        self.category
    }

    /// Brief description of what the rule checks.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Severity used when the configuration does not override it.
    #[must_use]
    pub fn default_severity(&self) -> Severity {
        self.default_severity
    }

    /// Default options merged in when the configuration provides none.
    #[must_use]
    pub fn default_options(&self) -> Option<&toml::Value> {
        self.default_options.as_ref()
    }

    /// Message templates keyed by message id. `{name}` placeholders are
    /// filled from the report's structured data.
    #[must_use]
    pub fn messages(&self) -> &HashMap<String, String> {
        &self.messages
    }

    /// The declared (selector text, callback) pairs.
    #[must_use]
    pub fn visitors(&self) -> &[(String, VisitorFn)] {
        &self.visitors
    }

    /// Document-start hook, if declared.
    #[must_use]
    pub fn on_start(&self) -> Option<&HookFn> {
        self.on_start.as_ref()
    }

    /// Document-end hook, if declared.
    #[must_use]
    pub fn on_end(&self) -> Option<&HookFn> {
        self.on_end.as_ref()
    }

    /// Validates configured options against the rule's schema.
    ///
    /// # Errors
    ///
    /// Returns the validator's message when the options are rejected.
    pub fn validate_options(&self, options: &toml::Value) -> Result<(), String> {
        match &self.options_validator {
            Some(validate) => validate(options),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for RuleDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleDefinition")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("default_severity", &self.default_severity)
            .field(
                "selectors",
                &self.visitors.iter().map(|(s, _)| s).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Builder for [`RuleDefinition`].
pub struct RuleDefinitionBuilder {
    def: RuleDefinition,
}

impl RuleDefinitionBuilder {
    /// Sets the description.
    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.def.description = text.into();
        self
    }

    /// Sets the default severity.
    #[must_use]
    pub fn default_severity(mut self, severity: Severity) -> Self {
        self.def.default_severity = severity;
        self
    }

    /// Sets the default options.
    #[must_use]
    pub fn default_options(mut self, options: toml::Value) -> Self {
        self.def.default_options = Some(options);
        self
    }

    /// Adds a message template under a message id.
    #[must_use]
    pub fn message(mut self, id: impl Into<String>, template: impl Into<String>) -> Self {
        self.def.messages.insert(id.into(), template.into());
        self
    }

    /// Registers a visitor callback for a selector.
    #[must_use]
    pub fn visitor(
        mut self,
        selector: impl Into<String>,
        callback: impl Fn(&mut RuleContext<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.def.visitors.push((selector.into(), Arc::new(callback)));
        self
    }

    /// Registers a document-start hook.
    #[must_use]
    pub fn on_start(
        mut self,
        hook: impl Fn(&mut RuleContext<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.def.on_start = Some(Arc::new(hook));
        self
    }

    /// Registers a document-end hook.
    #[must_use]
    pub fn on_end(mut self, hook: impl Fn(&mut RuleContext<'_>) + Send + Sync + 'static) -> Self {
        self.def.on_end = Some(Arc::new(hook));
        self
    }

    /// Registers an options validator.
    #[must_use]
    pub fn options_validator(
        mut self,
        validate: impl Fn(&toml::Value) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.def.options_validator = Some(Arc::new(validate));
        self
    }

    /// Finishes the definition.
    #[must_use]
    pub fn build(self) -> RuleDefinition {
        self.def
    }
}

/// Loads rule definitions by name.
///
/// The engine resolves every configured rule through the registry exactly
/// once, before the visitor index is built; the dispatch loop never loads.
pub trait RuleRegistry: Send + Sync {
    /// Returns the definition for `name`, or `None` if unknown.
    ///
    /// Unknown names referenced from configuration are ignored by the
    /// engine (with a warning), never treated as an error.
    fn load(&self, name: &str) -> Option<Arc<RuleDefinition>>;

    /// Names of every rule this registry can load.
    fn names(&self) -> Vec<String>;
}

/// A registry backed by a pre-built map.
#[derive(Default)]
pub struct StaticRegistry {
    rules: HashMap<String, Arc<RuleDefinition>>,
}

impl StaticRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition, replacing any previous rule of the same name.
    pub fn register(&mut self, definition: RuleDefinition) {
        self.rules
            .insert(definition.name().to_string(), Arc::new(definition));
    }
}

impl RuleRegistry for StaticRegistry {
    fn load(&self, name: &str) -> Option<Arc<RuleDefinition>> {
        self.rules.get(name).cloned()
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.rules.keys().cloned().collect();
        names.sort();
        names
    }
}

/// A rule that survived configuration resolution: definition plus its
/// effective severity and options for this run.
#[derive(Debug, Clone)]
pub struct ActiveRule {
    /// The loaded definition.
    pub definition: Arc<RuleDefinition>,
    /// Effective severity (never `Off`; off rules are dropped).
    pub severity: Severity,
    /// Effective options (configured, else the rule's defaults, else an
    /// empty table).
    pub options: toml::Value,
}

/// Resolves the configured rule set against a registry.
///
/// Runs once per linter construction: unknown rule names are skipped with
/// a warning, `off` rules are dropped, and options are validated eagerly
/// so schema failures surface before any document is linted.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidOptions`] if a rule rejects its options.
pub fn resolve_rules(
    config: &LinterConfig,
    registry: &dyn RuleRegistry,
) -> Result<Vec<ActiveRule>, ConfigError> {
    let mut active = Vec::new();
    for (name, setting) in &config.rules {
        if setting.severity == Severity::Off {
            tracing::debug!("rule `{name}` is off, skipping");
            continue;
        }
        let Some(definition) = registry.load(name) else {
            tracing::warn!("unknown rule `{name}` in configuration, ignoring");
            continue;
        };
        let options = setting
            .options
            .clone()
            .or_else(|| definition.default_options().cloned())
            .unwrap_or_else(|| toml::Value::Table(toml::map::Map::new()));
        definition
            .validate_options(&options)
            .map_err(|reason| ConfigError::InvalidOptions {
                rule: name.clone(),
                reason,
            })?;
        active.push(ActiveRule {
            definition,
            severity: setting.severity,
            options,
        });
    }
    Ok(active)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleSetting;

    fn dummy_rule(name: &str) -> RuleDefinition {
        RuleDefinition::builder(name, ProblemCategory::Problem)
            .description("a test rule")
            .default_severity(Severity::Warn)
            .visitor("NetworkRule", |_ctx| {})
            .build()
    }

    #[test]
    fn registry_roundtrip() {
        let mut registry = StaticRegistry::new();
        registry.register(dummy_rule("rule-b"));
        registry.register(dummy_rule("rule-a"));

        assert!(registry.load("rule-a").is_some());
        assert!(registry.load("missing").is_none());
        assert_eq!(registry.names(), vec!["rule-a", "rule-b"]);
    }

    #[test]
    fn resolve_skips_unknown_and_off() {
        let mut registry = StaticRegistry::new();
        registry.register(dummy_rule("known"));

        let mut config = LinterConfig::default();
        config
            .rules
            .insert("known".to_string(), RuleSetting::new(Severity::Error));
        config
            .rules
            .insert("missing".to_string(), RuleSetting::new(Severity::Error));
        config
            .rules
            .insert("known-off".to_string(), RuleSetting::new(Severity::Off));

        let active = resolve_rules(&config, &registry).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].definition.name(), "known");
        assert_eq!(active[0].severity, Severity::Error);
    }

    #[test]
    fn resolve_validates_options_eagerly() {
        let mut registry = StaticRegistry::new();
        let rule = RuleDefinition::builder("strict", ProblemCategory::Problem)
            .options_validator(|opts| {
                opts.get("min")
                    .and_then(toml::Value::as_integer)
                    .map(|_| ())
                    .ok_or_else(|| "`min` must be an integer".to_string())
            })
            .build();
        registry.register(rule);

        let mut config = LinterConfig::default();
        config
            .rules
            .insert("strict".to_string(), RuleSetting::new(Severity::Error));

        let err = resolve_rules(&config, &registry).unwrap_err();
        assert!(err.to_string().contains("min"));
    }

    #[test]
    fn resolve_prefers_configured_options() {
        let mut registry = StaticRegistry::new();
        let rule = RuleDefinition::builder("opt", ProblemCategory::Problem)
            .default_options(toml::Value::Table({
                let mut t = toml::map::Map::new();
                t.insert("min".to_string(), toml::Value::Integer(4));
                t
            }))
            .build();
        registry.register(rule);

        let mut config = LinterConfig::default();
        config
            .rules
            .insert("opt".to_string(), RuleSetting::new(Severity::Warn));

        let active = resolve_rules(&config, &registry).unwrap();
        assert_eq!(
            active[0].options.get("min").and_then(toml::Value::as_integer),
            Some(4)
        );
    }
}
