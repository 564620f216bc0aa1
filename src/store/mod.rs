//! Rule store: the rule tree and manifest on disk.
//!
//! [`RuleStore`] holds locations only. Every top-level operation loads a
//! fresh [`RuleSnapshot`], so edits to the rule tree are picked up without a
//! restart and concurrent callers never share mutable state.

mod assets;
mod files;
mod loader;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::Value;
use tracing::debug;

pub use assets::{available_assets, load_asset, mime_type_for, Asset, LoadedAsset};
pub use files::{find_files_by_type, FileType};
pub use loader::{derive_scope_id, load_all_rules, split_frontmatter};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::manifest::{parse_manifest, parse_manifest_yaml};
use crate::models::{Manifest, ResolvedScopeSet, RuleDocument, RuleScope};
use crate::rules::{merge_rules, resolve_scope, search_rules, SearchQuery};

/// File name of the usage guide served by `get_mcp_instructions`.
pub const INSTRUCTIONS_FILE: &str = "mcp-instructions.md";

#[derive(Debug, Clone)]
pub struct RuleStore {
    rules_dir: PathBuf,
    manifest_path: PathBuf,
}

impl RuleStore {
    pub fn new(rules_dir: impl Into<PathBuf>, manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            rules_dir: rules_dir.into(),
            manifest_path: manifest_path.into(),
        }
    }

    /// Store rooted at `rules_dir` with the manifest at `<rules_dir>/manifest.yml`.
    pub fn open(rules_dir: impl Into<PathBuf>) -> Self {
        let rules_dir = rules_dir.into();
        let manifest_path = rules_dir.join("manifest.yml");
        Self::new(rules_dir, manifest_path)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.rules_dir, &config.manifest_path)
    }

    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    // ============================================================
    // Loading
    // ============================================================

    pub fn load_all_rules(&self) -> Result<Vec<RuleDocument>> {
        load_all_rules(&self.rules_dir)
    }

    /// Raw manifest value, or `None` when the manifest file does not exist.
    pub fn load_manifest_value(&self) -> Result<Option<Value>> {
        let text = match std::fs::read_to_string(&self.manifest_path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    path = %self.manifest_path.display(),
                    "Manifest not found, using empty manifest"
                );
                return Ok(None);
            }
            Err(e) => return Err(Error::store_read(&self.manifest_path, e)),
        };
        parse_manifest_yaml(&text, &self.manifest_path).map(Some)
    }

    pub fn load_manifest(&self) -> Result<Manifest> {
        Ok(self
            .load_manifest_value()?
            .map(|raw| parse_manifest(&raw))
            .unwrap_or_default())
    }

    pub fn snapshot(&self) -> Result<RuleSnapshot> {
        Ok(RuleSnapshot {
            manifest: self.load_manifest()?,
            rules: self.load_all_rules()?,
        })
    }

    // ============================================================
    // Engine operations (fresh snapshot per call)
    // ============================================================

    pub fn resolve_scope(&self, scope: RuleScope, id: &str) -> Result<ResolvedScopeSet> {
        Ok(resolve_scope(&self.load_manifest()?, scope, id))
    }

    /// Merged rules for a scope given as text, e.g. from a resource URI.
    pub fn get_merged_rules(&self, scope: &str, id: &str) -> Result<String> {
        let scope = RuleScope::from_str(scope)?;
        self.merged_rules(scope, id)
    }

    pub fn merged_rules(&self, scope: RuleScope, id: &str) -> Result<String> {
        self.snapshot().map(|snapshot| snapshot.merged_rules(scope, id))
    }

    pub fn search_rules(&self, query: &SearchQuery) -> Result<String> {
        search_rules(&self.load_all_rules()?, query)
    }

    pub fn available_scope_ids(&self, scope: RuleScope) -> Result<Vec<String>> {
        Ok(self.load_manifest()?.ids(scope))
    }

    /// Every manifest id, grouped by scope in manifest order.
    pub fn rule_scope_entries(&self) -> Result<Vec<(RuleScope, Vec<String>)>> {
        let manifest = self.load_manifest()?;
        Ok(RuleScope::ALL
            .into_iter()
            .map(|scope| (scope, manifest.ids(scope)))
            .collect())
    }

    pub fn available_assets(&self) -> Result<BTreeMap<String, Asset>> {
        available_assets(&self.rules_dir)
    }

    pub fn load_asset(&self, name: &str) -> Result<LoadedAsset> {
        load_asset(&self.rules_dir, name)
    }

    pub fn instructions(&self) -> Result<String> {
        let path = self.rules_dir.join(INSTRUCTIONS_FILE);
        std::fs::read_to_string(&path).map_err(|e| Error::store_read(path, e))
    }
}

/// An immutable, fully loaded view of the manifest and rule tree.
#[derive(Debug, Clone, Default)]
pub struct RuleSnapshot {
    pub manifest: Manifest,
    pub rules: Vec<RuleDocument>,
}

impl RuleSnapshot {
    pub fn resolve_scope(&self, scope: RuleScope, id: &str) -> ResolvedScopeSet {
        resolve_scope(&self.manifest, scope, id)
    }

    pub fn merge_rules(&self, resolved: &ResolvedScopeSet) -> String {
        merge_rules(&self.rules, resolved)
    }

    pub fn merged_rules(&self, scope: RuleScope, id: &str) -> String {
        self.merge_rules(&self.resolve_scope(scope, id))
    }

    pub fn search_rules(&self, query: &SearchQuery) -> Result<String> {
        search_rules(&self.rules, query)
    }
}
