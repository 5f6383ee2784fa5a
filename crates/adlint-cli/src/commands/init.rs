//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# adlint configuration
# See https://github.com/adlint-rs/adlint for documentation

# Allow inline `! adlint-disable` style comments to toggle rules
allow-inline-config = true

# Syntax dialects the lists target
syntax = ["common"]

# Rule configurations
# A rule is either a bare severity ("off", "warn", "error") or a table
# with a severity and rule-specific options.

[rules]
duplicated-hints = "error"
duplicated-hint-platforms = "error"
duplicated-modifiers = "error"
inconsistent-hint-platforms = "error"
unknown-hints = "warn"
min-rule-length = { severity = "warn", options = { min = 4 } }
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("adlint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created adlint.toml");
    println!("\nNext steps:");
    println!("  1. Edit adlint.toml to configure rules");
    println!("  2. Run: adlint check");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::DEFAULT_CONFIG;
    use adlint_core::{LinterConfig, Severity};

    #[test]
    fn template_parses_and_resolves() {
        let config = LinterConfig::parse(DEFAULT_CONFIG).unwrap();
        assert!(config.allow_inline_config);
        assert_eq!(config.rules["duplicated-hints"].severity, Severity::Error);
        assert_eq!(config.rules["min-rule-length"].severity, Severity::Warn);

        let registry = adlint_rules::builtin_registry();
        let active = adlint_core::resolve_rules(&config, &registry).unwrap();
        assert_eq!(active.len(), 6);
    }
}
