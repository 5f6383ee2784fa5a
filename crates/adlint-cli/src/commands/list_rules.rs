//! List rules command implementation.

use adlint_core::RuleRegistry;
use adlint_rules::builtin_registry;

/// Runs the list-rules command.
pub fn run() {
    let registry = builtin_registry();

    println!("Available rules:\n");
    println!("{:<30} {:<10} Description", "Name", "Default");
    println!("{}", "-".repeat(80));

    for name in registry.names() {
        if let Some(rule) = registry.load(&name) {
            println!(
                "{:<30} {:<10} {}",
                rule.name(),
                rule.default_severity(),
                rule.description()
            );
        }
    }

    println!("\nConfigure rules in adlint.toml, e.g.:");
    println!("  [rules]");
    println!("  duplicated-hints = \"error\"");
    println!("  min-rule-length = {{ severity = \"warn\", options = {{ min = 4 }} }}");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  adlint check --rules duplicated-hints,unknown-hints");
}
