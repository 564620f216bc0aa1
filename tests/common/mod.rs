//! Shared rule-tree fixture for integration specs.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

pub const MANIFEST: &str = r#"version: 1
defaults:
  globalGroup: global
projects:
  web-app:
    description: Storefront
    groups: [frontend]
    techs: [react]
    languages: [typescript]
  docs-site:
    description: Documentation
groups:
  global:
    description: Applies everywhere
  frontend: {}
techs:
  react:
    dependsOn: [javascript]
  javascript: {}
languages:
  typescript: {}
"#;

pub fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture dir");
    }
    fs::write(path, contents).expect("Failed to write fixture file");
}

fn rule(applies_to: &str, body: &str) -> String {
    format!("---\nappliesTo:\n  {}\n---\n{}", applies_to, body)
}

/// A small but complete rule tree: manifest, one rule per scope, the usage
/// guide and one asset.
pub fn rule_tree() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let root = dir.path();

    write(root, "manifest.yml", MANIFEST);
    write(
        root,
        "groups/global.md",
        &rule("groups: [global]", "# Global\n\nAlways write tests.\n"),
    );
    write(
        root,
        "groups/frontend.md",
        &rule("groups: [frontend]", "# Frontend\n\nPrefer accessible components.\n"),
    );
    write(
        root,
        "techs/react.md",
        &rule("techs: [react]", "# React\n\nUse hooks for state.\n"),
    );
    write(
        root,
        "techs/javascript.md",
        &rule("techs: [javascript]", "# JavaScript\n\nUse strict equality.\n"),
    );
    write(
        root,
        "languages/typescript.md",
        &rule("languages: [typescript]", "# TypeScript\n\nEnable strict mode.\n"),
    );
    write(
        root,
        "projects/web-app.md",
        &rule("projects: [web-app]", "# Web App\n\nWrite tests before deploying.\n"),
    );
    write(
        root,
        "mcp-instructions.md",
        "# Rulecast\n\nLoad rules://project/<id> before starting work.\n",
    );
    write(root, "assets/checklist.txt", "- [ ] lint\n- [ ] test\n");

    dir
}
