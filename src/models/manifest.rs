use std::collections::BTreeMap;

use serde::Serialize;

use super::RuleScope;

/// One node of the manifest: a project, group, tech or language.
///
/// Only techs use `depends_on`, and only projects use the three scope
/// reference lists. Unused lists stay empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub description: Option<String>,
    /// Tech ids this tech requires. Ids need not be declared under `techs`.
    pub depends_on: Vec<String>,
    pub groups: Vec<String>,
    pub techs: Vec<String>,
    pub languages: Vec<String>,
}

impl ManifestEntry {
    /// The reference list a project entry holds for `scope`.
    /// Projects do not reference other projects.
    pub fn references(&self, scope: RuleScope) -> &[String] {
        match scope {
            RuleScope::Project => &[],
            RuleScope::Group => &self.groups,
            RuleScope::Tech => &self.techs,
            RuleScope::Language => &self.languages,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDefaults {
    /// Group included in every resolution, whatever the requested scope.
    pub global_group: Option<String>,
}

/// The classification manifest.
///
/// Sections are keyed by id; ids are unique within a section but may repeat
/// across sections (a `typescript` tech and a `typescript` language are
/// distinct nodes).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Manifest {
    pub version: Option<f64>,
    pub projects: BTreeMap<String, ManifestEntry>,
    pub groups: BTreeMap<String, ManifestEntry>,
    pub techs: BTreeMap<String, ManifestEntry>,
    pub languages: BTreeMap<String, ManifestEntry>,
    pub defaults: ManifestDefaults,
}

impl Manifest {
    pub fn section(&self, scope: RuleScope) -> &BTreeMap<String, ManifestEntry> {
        match scope {
            RuleScope::Project => &self.projects,
            RuleScope::Group => &self.groups,
            RuleScope::Tech => &self.techs,
            RuleScope::Language => &self.languages,
        }
    }

    pub(crate) fn section_mut(&mut self, scope: RuleScope) -> &mut BTreeMap<String, ManifestEntry> {
        match scope {
            RuleScope::Project => &mut self.projects,
            RuleScope::Group => &mut self.groups,
            RuleScope::Tech => &mut self.techs,
            RuleScope::Language => &mut self.languages,
        }
    }

    pub fn entry(&self, scope: RuleScope, id: &str) -> Option<&ManifestEntry> {
        self.section(scope).get(id)
    }

    /// Every id declared for `scope`, in sorted order.
    pub fn ids(&self, scope: RuleScope) -> Vec<String> {
        self.section(scope).keys().cloned().collect()
    }

    pub fn global_group(&self) -> Option<&str> {
        self.defaults.global_group.as_deref()
    }
}
