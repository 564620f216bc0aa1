use serde_json::{Map, Value};

use super::UndeclaredDependencyPolicy;
use crate::models::ValidationResult;

const SECTIONS: [&str; 4] = ["projects", "groups", "techs", "languages"];
const PROJECT_LISTS: [&str; 3] = ["groups", "techs", "languages"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManifestValidationOptions {
    pub undeclared_dependencies: UndeclaredDependencyPolicy,
}

/// Structural validation of a raw manifest value with default options.
pub fn validate_manifest(raw: &Value, label: &str) -> ValidationResult {
    validate_manifest_with(raw, label, &ManifestValidationOptions::default())
}

/// Structural validation of a raw manifest value.
///
/// Every violation is collected; only a non-mapping root stops early.
pub fn validate_manifest_with(
    raw: &Value,
    label: &str,
    options: &ManifestValidationOptions,
) -> ValidationResult {
    let Some(root) = raw.as_object() else {
        return ValidationResult::invalid(format!("Manifest must be an object in {}", label));
    };

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if root.get("version").is_some_and(|v| !v.is_number()) {
        errors.push(format!("'version' must be a number in {}", label));
    }

    for section in SECTIONS {
        let Some(value) = root.get(section) else {
            continue;
        };
        let Some(entries) = value.as_object() else {
            errors.push(format!("'{}' must be an object in {}", section, label));
            continue;
        };

        for (key, entry) in entries {
            let Some(entry) = entry.as_object() else {
                errors.push(format!("'{}.{}' must be an object in {}", section, key, label));
                continue;
            };
            check_entry(section, key, entry, label, &mut errors);
        }
    }

    if let Some(defaults) = root.get("defaults") {
        match defaults.as_object() {
            None => errors.push(format!("'defaults' must be an object in {}", label)),
            Some(defaults) => {
                if defaults.get("globalGroup").is_some_and(|v| !v.is_string()) {
                    errors.push(format!("'defaults.globalGroup' must be a string in {}", label));
                }
            }
        }
    }

    match options.undeclared_dependencies {
        UndeclaredDependencyPolicy::Allow => {}
        UndeclaredDependencyPolicy::Warn => {
            warnings.extend(undeclared_dependencies(root, label));
        }
        UndeclaredDependencyPolicy::Error => {
            errors.extend(undeclared_dependencies(root, label));
        }
    }

    ValidationResult::from_findings(errors, warnings)
}

fn check_entry(
    section: &str,
    key: &str,
    entry: &Map<String, Value>,
    label: &str,
    errors: &mut Vec<String>,
) {
    if section == "projects" {
        for list in PROJECT_LISTS {
            if entry.get(list).is_some_and(|v| !is_string_array(v)) {
                errors.push(format!(
                    "'projects.{}.{}' must be a string array in {}",
                    key, list, label
                ));
            }
        }
    }

    if section == "techs" && entry.get("dependsOn").is_some_and(|v| !is_string_array(v)) {
        errors.push(format!(
            "'techs.{}.dependsOn' must be a string array in {}",
            key, label
        ));
    }

    if entry.get("description").is_some_and(|v| !v.is_string()) {
        errors.push(format!(
            "'{}.{}.description' must be a string in {}",
            section, key, label
        ));
    }
}

fn is_string_array(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| items.iter().all(Value::is_string))
}

/// One finding per `dependsOn` id that is not a key of `techs`.
fn undeclared_dependencies(root: &Map<String, Value>, label: &str) -> Vec<String> {
    let Some(techs) = root.get("techs").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut findings = Vec::new();
    for (key, entry) in techs {
        let dependencies = entry
            .get("dependsOn")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str);
        for dependency in dependencies {
            if !techs.contains_key(dependency) {
                findings.push(format!(
                    "'techs.{}.dependsOn' references undeclared tech '{}' in {}",
                    key, dependency, label
                ));
            }
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LABEL: &str = "rules/manifest.yml";

    fn full_manifest() -> Value {
        json!({
            "version": 1,
            "projects": {
                "org/Service-Module": {
                    "groups": ["global"],
                    "techs": ["react"],
                    "languages": ["typescript"],
                    "description": "Service rules"
                }
            },
            "groups": { "global": { "description": "Always" } },
            "techs": { "react": { "dependsOn": ["typescript"], "description": "React rules" } },
            "languages": { "typescript": { "description": "TS rules" } },
            "defaults": { "globalGroup": "global" }
        })
    }

    #[test]
    fn accepts_a_correct_manifest() {
        let result = validate_manifest(&full_manifest(), LABEL);
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn accepts_an_empty_manifest() {
        let result = validate_manifest(&json!({}), "m");
        assert!(result.valid);
    }

    #[test]
    fn rejects_non_object_root() {
        for raw in [json!("not-an-object"), json!(["a"]), Value::Null, json!(3)] {
            let result = validate_manifest(&raw, LABEL);
            assert!(!result.valid);
            assert_eq!(result.errors, vec!["Manifest must be an object in rules/manifest.yml"]);
        }
    }

    #[test]
    fn rejects_non_numeric_version() {
        let result = validate_manifest(&json!({ "version": "1" }), LABEL);
        assert!(!result.valid);
        assert!(result
            .errors
            .contains(&"'version' must be a number in rules/manifest.yml".to_string()));
    }

    #[test]
    fn rejects_non_array_project_scopes() {
        let result = validate_manifest(&json!({ "projects": { "p": { "groups": "g" } } }), "m");
        assert_eq!(result.errors, vec!["'projects.p.groups' must be a string array in m"]);
    }

    #[test]
    fn collects_every_violation() {
        let raw = json!({
            "version": "x",
            "projects": { "p": { "techs": [1], "languages": "ts", "description": 5 } },
            "groups": [],
            "techs": { "t": { "dependsOn": "a" }, "u": "nope" },
            "languages": null,
            "defaults": { "globalGroup": ["g"] }
        });

        let result = validate_manifest(&raw, "m");

        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![
                "'version' must be a number in m",
                "'projects.p.techs' must be a string array in m",
                "'projects.p.languages' must be a string array in m",
                "'projects.p.description' must be a string in m",
                "'groups' must be an object in m",
                "'techs.t.dependsOn' must be a string array in m",
                "'techs.u' must be an object in m",
                "'languages' must be an object in m",
                "'defaults.globalGroup' must be a string in m",
            ]
        );
    }

    #[test]
    fn rejects_non_object_defaults() {
        let result = validate_manifest(&json!({ "defaults": "global" }), "m");
        assert_eq!(result.errors, vec!["'defaults' must be an object in m"]);
    }

    #[test]
    fn undeclared_dependencies_follow_policy() {
        let raw = full_manifest();
        let message = "'techs.react.dependsOn' references undeclared tech 'typescript' in m";

        let warn = validate_manifest_with(
            &raw,
            "m",
            &ManifestValidationOptions {
                undeclared_dependencies: UndeclaredDependencyPolicy::Warn,
            },
        );
        assert!(warn.valid);
        assert_eq!(warn.warnings, vec![message]);

        let error = validate_manifest_with(
            &raw,
            "m",
            &ManifestValidationOptions {
                undeclared_dependencies: UndeclaredDependencyPolicy::Error,
            },
        );
        assert!(!error.valid);
        assert_eq!(error.errors, vec![message]);
    }
}
