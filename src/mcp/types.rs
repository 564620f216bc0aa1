//! Request types for MCP tools and the resource URI scheme.

use std::str::FromStr;

use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::RuleScope;

// ============================================================
// Request Types
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListScopeIdsRequest {
    #[schemars(description = "Scope type: project, group, tech or language")]
    pub scope: RuleScope,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchRulesRequest {
    #[schemars(description = "Keyword to search for")]
    pub keyword: String,
    #[schemars(description = "Optional: limit search to a scope (requires id)")]
    #[serde(default)]
    pub scope: Option<RuleScope>,
    #[schemars(description = "Optional: scope identifier (requires scope)")]
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct LoadResourceRequest {
    #[schemars(
        description = "Resource URI (e.g., \"assets://example.md\" or \"rules://project/my-project\")"
    )]
    pub uri: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ResolveScopeRequest {
    #[schemars(description = "Scope type: project, group, tech or language")]
    pub scope: RuleScope,
    #[schemars(description = "Identifier within the scope")]
    pub id: String,
}

// ============================================================
// Response Types
// ============================================================

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ResolvedEntryInfo {
    pub scope: String,
    pub id: String,
    /// Whether a rule file exists for this pair.
    pub has_rules: bool,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ResolveScopeResponse {
    pub scope: String,
    pub id: String,
    pub resolved: Vec<ResolvedEntryInfo>,
}

// ============================================================
// Resource URIs
// ============================================================

pub const ASSETS_PREFIX: &str = "assets://";
pub const RULES_PREFIX: &str = "rules://";

/// A parsed `assets://name` or `rules://scope/id` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUri {
    Asset(String),
    Rules { scope: RuleScope, id: String },
}

impl ResourceUri {
    pub fn asset(name: &str) -> String {
        format!("{}{}", ASSETS_PREFIX, name)
    }

    pub fn rules(scope: RuleScope, id: &str) -> String {
        format!("{}{}/{}", RULES_PREFIX, scope, id)
    }
}

impl FromStr for ResourceUri {
    type Err = Error;

    /// Ids may contain `/`; only the first segment after `rules://` is the scope.
    fn from_str(uri: &str) -> Result<Self> {
        if let Some(name) = uri.strip_prefix(ASSETS_PREFIX) {
            if name.is_empty() {
                return Err(Error::InvalidUri("Asset name is required".to_string()));
            }
            return Ok(Self::Asset(name.to_string()));
        }

        if let Some(path) = uri.strip_prefix(RULES_PREFIX) {
            let (scope, id) = path
                .split_once('/')
                .filter(|(scope, id)| !scope.is_empty() && !id.is_empty())
                .ok_or_else(|| {
                    Error::InvalidUri(
                        "Both scope and id are required in URI (format: rules://scope/id)"
                            .to_string(),
                    )
                })?;
            return Ok(Self::Rules {
                scope: RuleScope::from_str(scope)?,
                id: id.to_string(),
            });
        }

        Err(Error::InvalidUri(
            "Invalid URI format. Expected \"assets://name\" or \"rules://scope/id\"".to_string(),
        ))
    }
}
