use serde_json::Value;

use crate::models::{Frontmatter, RuleScope, ValidationResult};

/// Validate rule front-matter.
///
/// `appliesTo` must be a mapping with at least one non-empty scope array
/// (`projects`, `groups`, `techs` or `languages`). A `tags` value that is
/// not an array is only a warning.
pub fn validate_frontmatter(frontmatter: &Frontmatter, label: &str) -> ValidationResult {
    let applies_to = match frontmatter.get("appliesTo") {
        Some(value) if is_truthy(value) => value,
        _ => return ValidationResult::invalid(format!("Missing 'appliesTo' field in {}", label)),
    };

    let Some(applies_to) = applies_to.as_object() else {
        return ValidationResult::invalid(format!(
            "'appliesTo' field must be an object in {}",
            label
        ));
    };

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let has_any_values = RuleScope::ALL.iter().any(|scope| {
        applies_to
            .get(scope.section())
            .and_then(Value::as_array)
            .is_some_and(|ids| !ids.is_empty())
    });
    if !has_any_values {
        errors.push(format!(
            "'appliesTo' must include at least one non-empty scope array in {}",
            label
        ));
    }

    if frontmatter
        .get("tags")
        .is_some_and(|tags| is_truthy(tags) && !tags.is_array())
    {
        warnings.push(format!("'tags' field should be an array in {}", label));
    }

    ValidationResult::from_findings(errors, warnings)
}

/// YAML values that count as "set": everything except null, false, zero and "".
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
