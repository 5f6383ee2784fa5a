//! The built-in rule registry and configuration presets.

use adlint_core::{LinterConfig, RuleSetting, Severity, StaticRegistry};

/// Registry containing every built-in rule.
#[must_use]
pub fn builtin_registry() -> StaticRegistry {
    let mut registry = StaticRegistry::new();
    registry.register(crate::duplicated_hint_platforms::definition());
    registry.register(crate::duplicated_hints::definition());
    registry.register(crate::duplicated_modifiers::definition());
    registry.register(crate::inconsistent_hint_platforms::definition());
    registry.register(crate::min_rule_length::definition());
    registry.register(crate::unknown_hints::definition());
    registry
}

/// The recommended configuration: correctness rules as errors, the
/// advisory ones as warnings.
#[must_use]
pub fn recommended_config() -> LinterConfig {
    let mut config = LinterConfig::default();
    config.set_rule("duplicated-hint-platforms", RuleSetting::new(Severity::Error));
    config.set_rule("duplicated-hints", RuleSetting::new(Severity::Error));
    config.set_rule("duplicated-modifiers", RuleSetting::new(Severity::Error));
    config.set_rule(
        "inconsistent-hint-platforms",
        RuleSetting::new(Severity::Error),
    );
    config.set_rule("min-rule-length", RuleSetting::new(Severity::Warn));
    config.set_rule("unknown-hints", RuleSetting::new(Severity::Warn));
    config
}

/// A minimal configuration: only the rules that catch outright
/// contradictions, everything else off.
#[must_use]
pub fn minimal_config() -> LinterConfig {
    let mut config = LinterConfig::default();
    config.set_rule("duplicated-hints", RuleSetting::new(Severity::Error));
    config.set_rule(
        "inconsistent-hint-platforms",
        RuleSetting::new(Severity::Error),
    );
    config
}
