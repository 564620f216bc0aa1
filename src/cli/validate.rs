use std::path::Path;

use tracing::{debug, warn};

use super::{ERROR, VALID, WARNING};
use crate::error::Result;
use crate::models::ValidationResult;
use crate::store::RuleStore;
use crate::validate::{
    validate_frontmatter, validate_manifest_with, validate_markdown, BuiltinLinter, LintConfig,
    ManifestValidationOptions, MarkdownLinter,
};

/// Findings for one checked file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub label: String,
    pub result: ValidationResult,
}

/// Findings for the manifest followed by every rule file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub files: Vec<FileReport>,
}

impl ValidationReport {
    pub fn error_count(&self) -> usize {
        self.files.iter().map(|f| f.result.errors.len()).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.files.iter().map(|f| f.result.warnings.len()).sum()
    }

    /// Files with neither errors nor warnings.
    pub fn clean_count(&self) -> usize {
        self.files.iter().filter(|f| f.result.is_clean()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Validating rule files\n\n");

        for file in &self.files {
            out.push_str(&format!("Checking {}...\n", file.label));
            let result = &file.result;
            if !result.errors.is_empty() {
                out.push_str(&format!("  {} {} error(s)\n", ERROR, result.errors.len()));
                for error in &result.errors {
                    out.push_str(&format!("    • {}\n", error));
                }
            }
            if !result.warnings.is_empty() {
                out.push_str(&format!("  {} {} warning(s)\n", WARNING, result.warnings.len()));
                for warning in &result.warnings {
                    out.push_str(&format!("    • {}\n", warning));
                }
            }
            if result.is_clean() {
                out.push_str(&format!("  {} Valid\n", VALID));
            }
            out.push('\n');
        }

        let errors = self.error_count();
        let warnings = self.warning_count();

        out.push_str("Summary\n\n");
        out.push_str(&format!("  Total files: {}\n", self.files.len()));
        out.push_str(&format!("  {} Valid: {}\n", VALID, self.clean_count()));
        if warnings > 0 {
            out.push_str(&format!("  {} Warnings: {}\n", WARNING, warnings));
        }
        if errors > 0 {
            out.push_str(&format!("  {} Errors: {}\n", ERROR, errors));
        }
        out.push('\n');

        if errors > 0 {
            out.push_str(&format!("{} Validation failed with {} error(s)\n", ERROR, errors));
        } else if warnings > 0 {
            out.push_str(&format!(
                "{} Validation passed with {} warning(s)\n",
                WARNING, warnings
            ));
        } else {
            out.push_str(&format!("{} All files are valid\n", VALID));
        }
        out
    }
}

/// Linter configured from a markdownlint config file.
///
/// A missing or unreadable file falls back to every rule enabled with
/// defaults.
pub fn load_linter(config_path: &Path) -> BuiltinLinter {
    if !config_path.exists() {
        debug!(path = %config_path.display(), "No markdownlint config, using defaults");
        return BuiltinLinter::default();
    }
    match LintConfig::load(config_path) {
        Ok(config) => BuiltinLinter::new(config),
        Err(e) => {
            warn!(path = %config_path.display(), error = %e, "Ignoring markdownlint config");
            BuiltinLinter::default()
        }
    }
}

/// Validate the manifest and every rule file of a store.
///
/// A missing manifest is reported as a warning rather than checked.
/// Unreadable files or a syntactically broken manifest are errors of the
/// run itself and propagate.
pub fn run_validation(
    store: &RuleStore,
    linter: &dyn MarkdownLinter,
    options: &ManifestValidationOptions,
) -> Result<ValidationReport> {
    let mut report = ValidationReport::default();

    let manifest_label = store.manifest_path().display().to_string();
    let manifest_result = match store.load_manifest_value()? {
        Some(raw) => validate_manifest_with(&raw, &manifest_label, options),
        None => {
            warn!(path = %manifest_label, "Manifest not found");
            ValidationResult::from_findings(
                Vec::new(),
                vec![format!("Manifest not found at {}", manifest_label)],
            )
        }
    };
    report.files.push(FileReport {
        label: manifest_label,
        result: manifest_result,
    });

    for rule in store.load_all_rules()? {
        let label = rule.relative_path.clone();
        let result = validate_frontmatter(&rule.frontmatter, &label)
            .merge(validate_markdown(linter, &rule.content, &label));
        report.files.push(FileReport { label, result });
    }

    debug!(
        files = report.files.len(),
        errors = report.error_count(),
        warnings = report.warning_count(),
        "Validation finished"
    );
    Ok(report)
}
