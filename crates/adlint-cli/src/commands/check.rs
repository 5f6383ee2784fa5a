//! Check command implementation.

use anyhow::{Context, Result};
use adlint_core::{Linter, LinterConfig};
use adlint_rules::{builtin_registry, recommended_config};
use adlint_syntax::{sub_parsers, FilterListParser};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::output;
use crate::OutputFormat;

/// File extensions treated as filter lists when walking directories.
const LIST_EXTENSIONS: &[&str] = &["txt", "adblock"];

/// Runs the check command.
pub fn run(
    paths: &[PathBuf],
    format: OutputFormat,
    fix: bool,
    rules_filter: Option<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(filter) = rules_filter {
        apply_rules_filter(&mut config, &filter);
    }

    let linter = Linter::builder()
        .parser(Arc::new(FilterListParser::new()))
        .registry(Arc::new(builtin_registry()))
        .sub_parsers(sub_parsers())
        .config(config)
        .build()
        .context("Failed to build linter")?;

    let files = collect_files(paths)?;
    tracing::debug!(files = files.len(), rules = linter.rule_count(), "checking");

    let mut total_errors = 0;
    let mut total_warnings = 0;
    let mut total_fatal = 0;
    let mut any_errors = false;

    for file in &files {
        let text = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;

        let result = if fix {
            let outcome = linter.lint_with_fixes(&text);
            if outcome.fixed != text {
                std::fs::write(file, &outcome.fixed)
                    .with_context(|| format!("Failed to write {}", file.display()))?;
                println!("Fixed {}", file.display());
            }
            // Only what the fixer could not resolve is left to report.
            let mut remaining = adlint_core::LintResult::new();
            for problem in outcome.unresolved {
                remaining.push(problem);
            }
            remaining
        } else {
            linter.lint(&text)
        };

        output::print(file, &result, format)?;

        total_errors += result.error_count;
        total_warnings += result.warning_count;
        total_fatal += result.fatal_count;
        any_errors |= result.has_errors();
    }

    if matches!(format, OutputFormat::Text) {
        output::print_summary(total_errors, total_warnings, total_fatal, files.len());
    }

    if any_errors {
        std::process::exit(1);
    }
    Ok(())
}

/// Loads the configuration: explicit path, `adlint.toml` in the current
/// directory, or the recommended preset.
fn load_config(config_path: Option<&Path>) -> Result<LinterConfig> {
    if let Some(path) = config_path {
        return LinterConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()));
    }
    let default_path = Path::new("adlint.toml");
    if default_path.exists() {
        tracing::debug!("using {}", default_path.display());
        return LinterConfig::from_file(default_path)
            .with_context(|| format!("Failed to load config: {}", default_path.display()));
    }
    Ok(recommended_config())
}

/// Keeps only the named rules in the configuration.
fn apply_rules_filter(config: &mut LinterConfig, filter: &str) {
    let wanted: Vec<&str> = filter.split(',').map(str::trim).collect();
    config.rules.retain(|name, _| wanted.contains(&name.as_str()));
    for name in wanted {
        if !config.rules.contains_key(name) {
            tracing::warn!("rule `{name}` is not in the configuration");
        }
    }
}

/// Expands path arguments into the list of files to lint.
///
/// Explicit file arguments are always linted; directories are walked with
/// gitignore handling and filtered to filter list extensions.
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        for entry in ignore::WalkBuilder::new(path).build() {
            let entry = entry?;
            let p = entry.path();
            if !p.is_file() {
                continue;
            }
            let matches_ext = p
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| LIST_EXTENSIONS.contains(&e));
            if matches_ext {
                files.push(p.to_path_buf());
            }
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_files_walks_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("list.txt"), "||example.com^").unwrap();
        std::fs::write(dir.path().join("notes.md"), "not a list").unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("more.adblock"), "##.ad").unwrap();

        let files = collect_files(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<String> = files
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["list.txt", "more.adblock"]);
    }

    #[test]
    fn collect_files_takes_explicit_files_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("anything.list");
        std::fs::write(&file, "||example.com^").unwrap();

        let files = collect_files(&[file.clone()]).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn missing_config_falls_back_to_recommended() {
        let config = load_config(None).unwrap();
        assert!(!config.rules.is_empty());
    }

    #[test]
    fn rules_filter_retains_named_rules() {
        let mut config = recommended_config();
        apply_rules_filter(&mut config, "duplicated-hints, unknown-hints");
        let names: Vec<&String> = config.rules.keys().collect();
        assert_eq!(names, vec!["duplicated-hints", "unknown-hints"]);
    }
}
