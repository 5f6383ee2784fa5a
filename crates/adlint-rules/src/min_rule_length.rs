//! `min-rule-length`: flags suspiciously short rules.
//!
//! Very short network patterns (`a`, `.js`) tend to over-block; this rule
//! flags any network or cosmetic rule shorter than the configured minimum.

use adlint_core::{ProblemCategory, Report, RuleDefinition, Severity};

const DEFAULT_MIN: i64 = 4;

fn configured_min(options: &toml::Value) -> usize {
    let min = options
        .get("min")
        .and_then(toml::Value::as_integer)
        .unwrap_or(DEFAULT_MIN);
    usize::try_from(min).unwrap_or(0)
}

pub(crate) fn definition() -> RuleDefinition {
    RuleDefinition::builder("min-rule-length", ProblemCategory::Style)
        .description("Disallows rules shorter than a configured minimum length")
        .default_severity(Severity::Warn)
        .default_options(toml::Value::Table({
            let mut t = toml::map::Map::new();
            t.insert("min".to_string(), toml::Value::Integer(DEFAULT_MIN));
            t
        }))
        .message(
            "too-short",
            "rule is shorter than the minimum length of {min}",
        )
        .options_validator(|options| match options.get("min") {
            None => Ok(()),
            Some(v) if v.as_integer().is_some_and(|n| n >= 1) => Ok(()),
            Some(_) => Err("`min` must be an integer of at least 1".to_string()),
        })
        .visitor("NetworkRule, CosmeticRule", |ctx| {
            let Some(node) = ctx.node() else { return };
            let min = configured_min(ctx.options());
            if node.span.len() < min {
                ctx.report(
                    Report::from_catalog(node.span, "too-short")
                        .data(serde_json::json!({ "min": min })),
                );
            }
        })
        .build()
}

#[cfg(test)]
mod tests {
    use crate::test_support::linter_with_options;
    use adlint_core::{Position, Severity};

    fn options(min: i64) -> Option<toml::Value> {
        let mut t = toml::map::Map::new();
        t.insert("min".to_string(), toml::Value::Integer(min));
        Some(toml::Value::Table(t))
    }

    #[test]
    fn short_rule_is_flagged() {
        let linter = linter_with_options("min-rule-length", Severity::Error, options(4));
        let result = linter.lint("aaa");
        assert_eq!(result.problems.len(), 1);
        let p = &result.problems[0];
        assert_eq!(p.severity, Severity::Error);
        assert_eq!(p.start, Position::new(1, 0));
        assert_eq!(p.end, Position::new(1, 3));
        assert!(p.message.contains('4'));
    }

    #[test]
    fn long_enough_rule_passes() {
        let linter = linter_with_options("min-rule-length", Severity::Error, options(4));
        let result = linter.lint("||example.com^");
        assert!(result.problems.is_empty());
    }

    #[test]
    fn comments_are_not_measured() {
        let linter = linter_with_options("min-rule-length", Severity::Error, options(10));
        let result = linter.lint("! hi");
        assert!(result.problems.is_empty());
    }

    #[test]
    fn invalid_min_rejected_at_build_time() {
        use adlint_core::{Linter, LinterConfig, LinterError, RuleSetting};
        use adlint_syntax::FilterListParser;
        use std::sync::Arc;

        let mut config = LinterConfig::default();
        config.set_rule(
            "min-rule-length",
            RuleSetting::new(Severity::Error).with_options(toml::Value::Table({
                let mut t = toml::map::Map::new();
                t.insert("min".to_string(), toml::Value::Integer(0));
                t
            })),
        );
        let err = Linter::builder()
            .parser(Arc::new(FilterListParser::new()))
            .registry(Arc::new(crate::builtin_registry()))
            .config(config)
            .build();
        assert!(matches!(err, Err(LinterError::Config(_))));
    }
}
