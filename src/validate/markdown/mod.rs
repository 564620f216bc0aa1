//! Markdown content checks.
//!
//! Linting goes through the [`MarkdownLinter`] seam; [`BuiltinLinter`] is the
//! bundled implementation. Lint findings are always warnings. A linter that
//! fails outright produces a single error for the file.

mod config;
mod rules;

pub use config::LintConfig;

use crate::error::Result;
use crate::models::ValidationResult;

/// One lint finding, shaped after markdownlint's result objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    pub line_number: usize,
    /// Rule id first, then aliases, e.g. `["MD009", "no-trailing-spaces"]`.
    pub rule_names: Vec<&'static str>,
    pub rule_description: &'static str,
    pub error_detail: Option<String>,
    pub error_context: Option<String>,
}

impl LintIssue {
    /// `file:line: MD009/no-trailing-spaces Trailing spaces - detail Context: "…"`
    pub fn message(&self, label: &str) -> String {
        let mut message = format!(
            "{}:{}: {} {}",
            label,
            self.line_number,
            self.rule_names.join("/"),
            self.rule_description
        );
        if let Some(detail) = &self.error_detail {
            message.push_str(" - ");
            message.push_str(detail);
        }
        if let Some(context) = &self.error_context {
            message.push_str(&format!(" Context: \"{}\"", context));
        }
        message
    }
}

/// A markdown linting capability.
pub trait MarkdownLinter: Send + Sync {
    fn lint(&self, label: &str, content: &str) -> Result<Vec<LintIssue>>;
}

/// Bundled linter implementing a subset of markdownlint's rules.
#[derive(Debug, Clone, Default)]
pub struct BuiltinLinter {
    config: LintConfig,
}

impl BuiltinLinter {
    pub fn new(config: LintConfig) -> Self {
        Self { config }
    }
}

impl MarkdownLinter for BuiltinLinter {
    fn lint(&self, _label: &str, content: &str) -> Result<Vec<LintIssue>> {
        let document = rules::Document::parse(content);
        let mut issues: Vec<LintIssue> = rules::RULES
            .iter()
            .filter(|rule| self.config.is_enabled(rule.names))
            .flat_map(|rule| {
                let options = self.config.options(rule.names);
                (rule.check)(&document, options)
                    .into_iter()
                    .map(move |finding| LintIssue {
                        line_number: finding.line,
                        rule_names: rule.names.to_vec(),
                        rule_description: rule.description,
                        error_detail: finding.detail,
                        error_context: finding.context,
                    })
            })
            .collect();

        issues.sort_by(|a, b| {
            a.line_number
                .cmp(&b.line_number)
                .then_with(|| a.rule_names.cmp(&b.rule_names))
        });
        Ok(issues)
    }
}

/// Validate markdown body text.
///
/// Blank content is a warning. Every lint finding is a warning. Only a
/// failing linter makes the result invalid.
pub fn validate_markdown(
    linter: &dyn MarkdownLinter,
    content: &str,
    label: &str,
) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if content.trim().is_empty() {
        warnings.push(format!("Empty content in {}", label));
    }

    match linter.lint(label, content) {
        Ok(issues) => warnings.extend(issues.iter().map(|issue| issue.message(label))),
        Err(e) => errors.push(format!("Markdown validation failed for {}: {}", label, e)),
    }

    ValidationResult::from_findings(errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    struct FailingLinter;

    impl MarkdownLinter for FailingLinter {
        fn lint(&self, _label: &str, _content: &str) -> Result<Vec<LintIssue>> {
            Err(Error::Lint("linter crashed".to_string()))
        }
    }

    #[test]
    fn empty_content_is_a_warning() {
        for content in ["", "   \n\t  "] {
            let result = validate_markdown(&BuiltinLinter::default(), content, "test.md");
            assert!(result.valid);
            assert!(result.warnings.iter().any(|w| w.contains("Empty content")));
        }
    }

    #[test]
    fn valid_markdown_has_no_findings() {
        let content = "# Heading\n\nThis is valid markdown content.\n\n- List item 1\n- List item 2\n";

        let result = validate_markdown(&BuiltinLinter::default(), content, "test.md");

        assert!(result.valid);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn lint_findings_are_warnings() {
        let content = "## Heading\n\nContent here. \n";

        let result = validate_markdown(&BuiltinLinter::default(), content, "test.md");

        assert!(result.valid);
        assert_eq!(
            result.warnings,
            vec![
                "test.md:1: MD041/first-line-heading/first-line-h1 First line in a file should be a top level heading Context: \"## Heading\"",
                "test.md:3: MD009/no-trailing-spaces Trailing spaces - Expected: 0 or 2; Actual: 1",
            ]
        );
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let config = LintConfig::from_value(&json!({ "MD041": false })).unwrap();
        let linter = BuiltinLinter::new(config);

        let result = validate_markdown(&linter, "## Heading\n", "test.md");

        assert!(result.warnings.is_empty());
    }

    #[test]
    fn linter_failure_is_an_error() {
        let result = validate_markdown(&FailingLinter, "# Title\n", "test.md");

        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec!["Markdown validation failed for test.md: Markdown lint failed: linter crashed"]
        );
    }
}
