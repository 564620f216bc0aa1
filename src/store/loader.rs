//! Rule document loading.
//!
//! Loading is permissive: a rule file whose front-matter is malformed still
//! loads, with an empty front-matter mapping. Enforcing shape is the job of
//! [`crate::validate::validate_frontmatter`].

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use super::files::{find_files_by_type, relative_slash_path, FileType};
use crate::error::{Error, Result};
use crate::models::{Frontmatter, RuleDocument, RuleScope};

const DELIMITER: &str = "---";

/// Load every markdown rule file below `root`.
///
/// A missing root yields an empty list.
pub fn load_all_rules(root: &Path) -> Result<Vec<RuleDocument>> {
    let files = find_files_by_type(root, FileType::Markdown)?;
    let mut rules = Vec::with_capacity(files.len());

    for path in files {
        let text = std::fs::read_to_string(&path).map_err(|e| Error::store_read(&path, e))?;
        let relative_path = relative_slash_path(root, &path);
        let (scope, id) = derive_scope_id(&relative_path);
        let (frontmatter, content) = split_frontmatter(&text);

        rules.push(RuleDocument {
            path: absolute(&path),
            relative_path,
            scope,
            id,
            frontmatter,
            content,
        });
    }

    debug!(root = %root.display(), count = rules.len(), "Loaded rules");
    Ok(rules)
}

fn absolute(path: &Path) -> std::path::PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Derive `(scope, id)` from `<scope-dir>/<id>.md`.
///
/// The id keeps any further path segments, so `projects/org/app.md` is
/// project `org/app`. Files outside a scope directory have neither.
pub fn derive_scope_id(relative_path: &str) -> (Option<RuleScope>, Option<String>) {
    let Some((dir, rest)) = relative_path.split_once('/') else {
        return (None, None);
    };
    let Some(scope) = RuleScope::from_dir_name(dir) else {
        return (None, None);
    };
    match rest.strip_suffix(".md") {
        Some(id) if !id.is_empty() => (Some(scope), Some(id.to_string())),
        _ => (None, None),
    }
}

/// Split a rule file into front-matter and body.
///
/// Front-matter is a YAML block opened by a `---` first line and closed by
/// the next `---` line. Without a closing line the whole text is body.
/// YAML that fails to parse, or parses to something other than a mapping,
/// gives an empty front-matter.
pub fn split_frontmatter(text: &str) -> (Frontmatter, String) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return (Frontmatter::new(), String::new());
    };
    if first.trim_end() != DELIMITER {
        return (Frontmatter::new(), text.to_string());
    }

    let mut offset = first.len();
    let yaml_start = offset;
    for line in lines {
        if line.trim_end() == DELIMITER {
            let yaml = &text[yaml_start..offset];
            let body = &text[offset + line.len()..];
            return (parse_frontmatter(yaml), body.to_string());
        }
        offset += line.len();
    }

    (Frontmatter::new(), text.to_string())
}

fn parse_frontmatter(yaml: &str) -> Frontmatter {
    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Object(map)) => map,
        Ok(_) => Frontmatter::new(),
        Err(e) => {
            debug!(error = %e, "Ignoring unparseable front-matter");
            Frontmatter::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn splits_frontmatter_and_body() {
        let text = "---\nappliesTo:\n  techs: [react]\ntags: [ui]\n---\n# React\n\nUse hooks.\n";

        let (frontmatter, body) = split_frontmatter(text);

        assert_eq!(frontmatter["appliesTo"], json!({ "techs": ["react"] }));
        assert_eq!(frontmatter["tags"], json!(["ui"]));
        assert_eq!(body, "# React\n\nUse hooks.\n");
    }

    #[test]
    fn text_without_frontmatter_is_all_body() {
        let (frontmatter, body) = split_frontmatter("# Title\n\nBody\n");
        assert!(frontmatter.is_empty());
        assert_eq!(body, "# Title\n\nBody\n");
    }

    #[test]
    fn unterminated_block_is_body() {
        let text = "---\nappliesTo: {}\n# Title\n";
        let (frontmatter, body) = split_frontmatter(text);
        assert!(frontmatter.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn malformed_yaml_yields_empty_frontmatter() {
        let (frontmatter, body) = split_frontmatter("---\nappliesTo: [unclosed\n---\nBody\n");
        assert!(frontmatter.is_empty());
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn scalar_yaml_yields_empty_frontmatter() {
        let (frontmatter, body) = split_frontmatter("---\njust a string\n---\nBody");
        assert!(frontmatter.is_empty());
        assert_eq!(body, "Body");
    }

    #[test]
    fn handles_crlf_delimiters() {
        let (frontmatter, body) = split_frontmatter("---\r\ntags: [a]\r\n---\r\nBody\r\n");
        assert_eq!(frontmatter["tags"], json!(["a"]));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn derives_scope_and_id_from_path() {
        assert_eq!(
            derive_scope_id("techs/react.md"),
            (Some(RuleScope::Tech), Some("react".to_string()))
        );
        assert_eq!(
            derive_scope_id("project/org/Service-Module.md"),
            (Some(RuleScope::Project), Some("org/Service-Module".to_string()))
        );
        assert_eq!(derive_scope_id("mcp-instructions.md"), (None, None));
        assert_eq!(derive_scope_id("assets/notes.md"), (None, None));
    }
}
