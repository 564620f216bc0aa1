//! Dependency closure over the manifest graph.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::models::{Manifest, ResolvedScopeSet, RuleScope, ScopeRef};

/// Compute the ordered set of `(scope, id)` pairs whose rules apply to `id`.
///
/// Order of the result:
/// 1. the global group, when `defaults.globalGroup` is set;
/// 2. for a project, its groups, techs and languages in declaration order,
///    then the project itself; for any other scope, just `(scope, id)`;
/// 3. techs reached through `dependsOn`, breadth-first in discovery order.
///
/// An id missing from the manifest is not an error. An undeclared project
/// resolves to the global group alone; other scopes keep the requested pair. Dependency ids that have no
/// `techs` entry are kept, so a rule file for them is still merged. Each
/// tech is expanded at most once, which bounds the walk by the number of
/// distinct tech ids even when `dependsOn` forms cycles.
pub fn resolve_scope(manifest: &Manifest, scope: RuleScope, id: &str) -> ResolvedScopeSet {
    let mut resolved = ResolvedScopeSet::new();

    if let Some(global) = manifest.global_group() {
        resolved.push(ScopeRef::new(RuleScope::Group, global));
    }

    match (scope, manifest.entry(RuleScope::Project, id)) {
        (RuleScope::Project, Some(project)) => {
            for referenced in [RuleScope::Group, RuleScope::Tech, RuleScope::Language] {
                for ref_id in project.references(referenced) {
                    resolved.push(ScopeRef::new(referenced, ref_id.as_str()));
                }
            }
            resolved.push(ScopeRef::new(RuleScope::Project, id));
        }
        (RuleScope::Project, None) => {}
        _ => {
            resolved.push(ScopeRef::new(scope, id));
        }
    }

    expand_tech_dependencies(manifest, &mut resolved);

    debug!(
        scope = %scope,
        id,
        resolved = resolved.len(),
        "Resolved scope closure"
    );
    resolved
}

fn expand_tech_dependencies(manifest: &Manifest, resolved: &mut ResolvedScopeSet) {
    let mut queue: VecDeque<String> = resolved
        .iter()
        .filter(|entry| entry.scope == RuleScope::Tech)
        .map(|entry| entry.id.clone())
        .collect();
    let mut visited: HashSet<String> = HashSet::new();

    while let Some(tech) = queue.pop_front() {
        if !visited.insert(tech.clone()) {
            continue;
        }
        let Some(entry) = manifest.entry(RuleScope::Tech, &tech) else {
            continue;
        };
        for dependency in &entry.depends_on {
            resolved.push(ScopeRef::new(RuleScope::Tech, dependency.as_str()));
            if !visited.contains(dependency) {
                queue.push_back(dependency.clone());
            }
        }
    }
}
