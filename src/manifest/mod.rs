//! Permissive manifest parsing.
//!
//! [`parse_manifest`] extracts whatever it can from a raw YAML/JSON value and
//! never fails: a field of the wrong type is skipped, non-string list items
//! are dropped, a non-mapping root yields an empty manifest. Structural
//! problems are reported by [`crate::validate::validate_manifest`], which
//! runs independently on the same raw value.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::models::{Manifest, ManifestEntry, RuleScope};

/// Build a [`Manifest`] from a raw value, ignoring anything malformed.
pub fn parse_manifest(raw: &Value) -> Manifest {
    let mut manifest = Manifest::default();
    let Some(root) = raw.as_object() else {
        return manifest;
    };

    manifest.version = root.get("version").and_then(Value::as_f64);

    for scope in RuleScope::ALL {
        let Some(section) = root.get(scope.section()).and_then(Value::as_object) else {
            continue;
        };
        let entries = manifest.section_mut(scope);
        for (id, entry) in section {
            // YAML `id:` with no body parses as null; treat it as an empty entry.
            let entry = match entry {
                Value::Object(map) => parse_entry(map),
                Value::Null => ManifestEntry::default(),
                _ => continue,
            };
            entries.insert(id.clone(), entry);
        }
    }

    if let Some(defaults) = root.get("defaults").and_then(Value::as_object) {
        manifest.defaults.global_group = defaults
            .get("globalGroup")
            .and_then(Value::as_str)
            .map(str::to_string);
    }

    manifest
}

fn parse_entry(map: &Map<String, Value>) -> ManifestEntry {
    ManifestEntry {
        description: map
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        depends_on: string_list(map.get("dependsOn")),
        groups: string_list(map.get("groups")),
        techs: string_list(map.get("techs")),
        languages: string_list(map.get("languages")),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Parse manifest YAML text into a raw value.
///
/// An empty document parses as `null`, which callers treat as an empty manifest.
pub fn parse_manifest_yaml(text: &str, path: &Path) -> Result<Value> {
    serde_yaml::from_str::<Value>(text).map_err(|e| Error::ManifestSyntax {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_all_sections() {
        let raw = json!({
            "version": 1,
            "projects": {
                "org/Service-Module": {
                    "groups": ["backend"],
                    "techs": ["react"],
                    "languages": ["typescript"],
                    "description": "Service rules"
                }
            },
            "groups": { "global": { "description": "Always" }, "backend": {} },
            "techs": { "react": { "dependsOn": ["typescript"] } },
            "languages": { "typescript": null },
            "defaults": { "globalGroup": "global" }
        });

        let manifest = parse_manifest(&raw);

        assert_eq!(manifest.version, Some(1.0));
        let project = manifest.entry(RuleScope::Project, "org/Service-Module").unwrap();
        assert_eq!(project.groups, vec!["backend"]);
        assert_eq!(project.description.as_deref(), Some("Service rules"));
        assert_eq!(manifest.techs["react"].depends_on, vec!["typescript"]);
        assert!(manifest.languages.contains_key("typescript"));
        assert_eq!(manifest.global_group(), Some("global"));
        assert_eq!(manifest.ids(RuleScope::Group), vec!["backend", "global"]);
    }

    #[test]
    fn skips_malformed_fields() {
        let raw = json!({
            "version": "1",
            "projects": { "p": { "groups": "g", "techs": ["ok", 3] }, "bad": [] },
            "techs": ["not", "a", "map"],
            "defaults": { "globalGroup": 7 }
        });

        let manifest = parse_manifest(&raw);

        assert_eq!(manifest.version, None);
        assert!(manifest.projects["p"].groups.is_empty());
        assert_eq!(manifest.projects["p"].techs, vec!["ok"]);
        assert!(!manifest.projects.contains_key("bad"));
        assert!(manifest.techs.is_empty());
        assert_eq!(manifest.global_group(), None);
    }

    #[test]
    fn non_object_root_is_empty() {
        assert_eq!(parse_manifest(&json!(["a"])), Manifest::default());
        assert_eq!(parse_manifest(&Value::Null), Manifest::default());
    }

    #[test]
    fn reports_yaml_syntax_errors() {
        let err = parse_manifest_yaml("projects: [unclosed", Path::new("m.yml")).unwrap_err();
        assert!(matches!(err, Error::ManifestSyntax { .. }));
    }
}
