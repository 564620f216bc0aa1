use std::fmt;
use std::str::FromStr;

use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One of the four classification axes rules are organized under.
///
/// The scope decides both which manifest section an id is looked up in and
/// which directory of the rule tree holds its rule files.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum RuleScope {
    Project,
    Group,
    Tech,
    Language,
}

impl RuleScope {
    /// All scopes in manifest order.
    pub const ALL: [RuleScope; 4] = [Self::Project, Self::Group, Self::Tech, Self::Language];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Group => "group",
            Self::Tech => "tech",
            Self::Language => "language",
        }
    }

    /// Manifest section key (and `appliesTo` key) for this scope.
    pub fn section(&self) -> &'static str {
        match self {
            Self::Project => "projects",
            Self::Group => "groups",
            Self::Tech => "techs",
            Self::Language => "languages",
        }
    }

    /// Map a rule-tree directory name to a scope. Both `tech` and `techs` work.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|scope| name == scope.as_str() || name == scope.section())
    }
}

impl FromStr for RuleScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| Error::UnknownScope(s.to_string()))
    }
}

impl fmt::Display for RuleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `(scope, id)` pair: one node of the applicability closure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ScopeRef {
    pub scope: RuleScope,
    pub id: String,
}

impl ScopeRef {
    pub fn new(scope: RuleScope, id: impl Into<String>) -> Self {
        Self {
            scope,
            id: id.into(),
        }
    }
}

impl fmt::Display for ScopeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.scope, self.id)
    }
}

/// Ordered, duplicate-free closure produced by one resolution call.
///
/// Order is significant: the merge engine emits rule bodies in exactly this
/// order. Never cached; build a fresh one per request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedScopeSet {
    entries: Vec<ScopeRef>,
}

impl ResolvedScopeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry` unless an equal pair is already present.
    /// Returns whether it was added.
    pub fn push(&mut self, entry: ScopeRef) -> bool {
        if self.contains(&entry) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn contains(&self, entry: &ScopeRef) -> bool {
        self.entries.iter().any(|e| e == entry)
    }

    pub fn entries(&self) -> &[ScopeRef] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScopeRef> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ResolvedScopeSet {
    type Item = &'a ScopeRef;
    type IntoIter = std::slice::Iter<'a, ScopeRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_scopes() {
        assert_eq!("tech".parse::<RuleScope>().unwrap(), RuleScope::Tech);
        assert_eq!("language".parse::<RuleScope>().unwrap(), RuleScope::Language);
    }

    #[test]
    fn rejects_unknown_scope() {
        let err = "module".parse::<RuleScope>().unwrap_err();
        assert!(matches!(err, Error::UnknownScope(ref s) if s == "module"));
    }

    #[test]
    fn maps_singular_and_plural_directories() {
        assert_eq!(RuleScope::from_dir_name("projects"), Some(RuleScope::Project));
        assert_eq!(RuleScope::from_dir_name("group"), Some(RuleScope::Group));
        assert_eq!(RuleScope::from_dir_name("assets"), None);
    }

    #[test]
    fn resolved_set_ignores_duplicates() {
        let mut set = ResolvedScopeSet::new();
        assert!(set.push(ScopeRef::new(RuleScope::Tech, "react")));
        assert!(!set.push(ScopeRef::new(RuleScope::Tech, "react")));
        assert!(set.push(ScopeRef::new(RuleScope::Language, "react")));
        assert_eq!(set.len(), 2);
    }
}
