//! Deterministic concatenation of rule bodies.

use crate::models::{ResolvedScopeSet, RuleDocument};

const SEPARATOR: &str = "\n\n";

/// Merge the bodies of every document matching `resolved`, in resolver order.
///
/// Documents sharing one `(scope, id)` keep their load order. Leading blank
/// lines and trailing whitespace are dropped from each body, leading
/// indentation is kept, and bodies are joined by exactly one blank line; blank bodies contribute
/// nothing. Pairs without a rule file are skipped, so the result may be empty.
pub fn merge_rules(rules: &[RuleDocument], resolved: &ResolvedScopeSet) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for entry in resolved {
        for rule in rules.iter().filter(|r| r.matches(entry.scope, &entry.id)) {
            let body = rule
                .content
                .trim_start_matches(['\n', '\r'])
                .trim_end();
            if !body.is_empty() {
                parts.push(body);
            }
        }
    }

    parts.join(SEPARATOR)
}
