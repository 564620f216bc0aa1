use std::path::PathBuf;

use serde::Serialize;

use super::{RuleScope, ScopeRef};

/// Parsed front-matter of a rule document.
///
/// Deliberately untyped: rule files may carry arbitrary extra keys, and
/// shape checks belong to the validation pass, not to loading.
pub type Frontmatter = serde_json::Map<String, serde_json::Value>;

/// A markdown rule file loaded from the rule tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleDocument {
    /// Absolute location on disk.
    pub path: PathBuf,
    /// Slash-separated path relative to the rule root, e.g. `techs/react.md`.
    pub relative_path: String,
    /// Scope derived from the first path segment; `None` outside scope directories.
    pub scope: Option<RuleScope>,
    /// Id derived from the remaining segments without the `.md` extension.
    pub id: Option<String>,
    pub frontmatter: Frontmatter,
    /// Markdown body after the front-matter block.
    pub content: String,
}

impl RuleDocument {
    pub fn scope_ref(&self) -> Option<ScopeRef> {
        match (self.scope, &self.id) {
            (Some(scope), Some(id)) => Some(ScopeRef::new(scope, id.clone())),
            _ => None,
        }
    }

    pub fn matches(&self, scope: RuleScope, id: &str) -> bool {
        self.scope == Some(scope) && self.id.as_deref() == Some(id)
    }

    /// Human-readable label: `scope/id` when derived, else the relative path.
    pub fn label(&self) -> String {
        match self.scope_ref() {
            Some(scope_ref) => scope_ref.to_string(),
            None => self.relative_path.clone(),
        }
    }
}
