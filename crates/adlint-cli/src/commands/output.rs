//! Shared output formatting for lint results.

use adlint_core::{LintResult, Severity};
use anyhow::Result;
use std::path::Path;

use crate::OutputFormat;

/// Prints one file's lint results in the specified format.
pub fn print(file: &Path, result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(file, result),
        OutputFormat::Json => return print_json(file, result),
        OutputFormat::Compact => print_compact(file, result),
    }
    Ok(())
}

fn severity_indicator(severity: Severity) -> &'static str {
    match severity {
        Severity::Fatal => "\x1b[35mfatal\x1b[0m",
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warn => "\x1b[33mwarning\x1b[0m",
        Severity::Off => "off",
    }
}

fn print_text(file: &Path, result: &LintResult) {
    for problem in &result.problems {
        println!(
            "{}:{}:{}",
            file.display(),
            problem.start.line,
            problem.start.column,
        );
        let rule = problem.rule.as_deref().unwrap_or("syntax");
        println!(
            "  {} [{}]: {}",
            severity_indicator(problem.severity),
            rule,
            problem.message
        );
        for suggestion in &problem.suggestions {
            println!("  = help: {}", suggestion.message);
        }
        println!();
    }
}

/// Prints the run summary with a color reflecting the worst outcome.
pub fn print_summary(errors: usize, warnings: usize, fatal: usize, files: usize) {
    let summary_color = if errors + fatal > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };
    println!(
        "{}Found {} error(s), {} warning(s), {} fatal in {} file(s)\x1b[0m",
        summary_color, errors, warnings, fatal, files
    );
}

fn print_json(file: &Path, result: &LintResult) -> Result<()> {
    let payload = serde_json::json!({
        "file": file.display().to_string(),
        "problems": result.problems,
        "warning_count": result.warning_count,
        "error_count": result.error_count,
        "fatal_count": result.fatal_count,
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn print_compact(file: &Path, result: &LintResult) {
    for problem in &result.problems {
        println!(
            "{}:{}:{}: {} [{}] {}",
            file.display(),
            problem.start.line,
            problem.start.column,
            problem.severity,
            problem.rule.as_deref().unwrap_or("syntax"),
            problem.message,
        );
    }
}
