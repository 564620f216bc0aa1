//! Validation layer.
//!
//! Checks run to completion and report every finding as data in a
//! [`ValidationResult`](crate::models::ValidationResult); only an
//! infrastructural failure (the markdown linter itself failing) is turned
//! into an error entry. Callers compose the checks; nothing here loads files.

mod frontmatter;
mod manifest;
pub mod markdown;

pub use frontmatter::validate_frontmatter;
pub use manifest::{validate_manifest, validate_manifest_with, ManifestValidationOptions};
pub use markdown::{validate_markdown, BuiltinLinter, LintConfig, LintIssue, MarkdownLinter};

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How manifest validation treats `dependsOn` ids that have no `techs` entry.
///
/// Resolution always follows such ids; this only decides whether
/// `validate` mentions them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum UndeclaredDependencyPolicy {
    #[default]
    Allow,
    Warn,
    Error,
}

impl UndeclaredDependencyPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl FromStr for UndeclaredDependencyPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(Error::InvalidArgument(format!(
                "Unknown undeclared dependency policy: {}",
                other
            ))),
        }
    }
}
