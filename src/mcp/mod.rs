//! MCP server exposing the rule engine as tools and resources.

mod types;

use std::str::FromStr;

pub use types::*;

use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{
        AnnotateAble, CallToolResult, Content, ListResourcesResult, PaginatedRequestParam,
        RawResource, ReadResourceRequestParam, ReadResourceResult, Resource, ResourceContents,
        ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
    ServiceExt,
};

use crate::error::Error;
use crate::models::RuleScope;
use crate::rules::SearchQuery;
use crate::store::RuleStore;

#[derive(Clone)]
pub struct McpServer {
    store: RuleStore,
    tool_router: ToolRouter<Self>,
}

/// Map engine errors onto MCP error codes.
fn mcp_err(e: Error) -> McpError {
    match e {
        Error::InvalidArgument(_) | Error::UnknownScope(_) | Error::InvalidUri(_) => {
            McpError::invalid_params(e.to_string(), None)
        }
        Error::UnknownAsset(_) => McpError::resource_not_found(e.to_string(), None),
        Error::StoreRead { .. } | Error::ManifestSyntax { .. } | Error::Lint(_) => {
            McpError::internal_error(e.to_string(), None)
        }
    }
}

impl McpServer {
    pub fn new(store: RuleStore) -> Self {
        Self {
            store,
            tool_router: Self::tool_router(),
        }
    }

    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    // ============================================================
    // Tool logic, shared by the tool handlers and tests
    // ============================================================

    pub fn instructions_text(&self) -> Result<String, McpError> {
        self.store.instructions().map_err(mcp_err)
    }

    pub fn scope_ids_text(&self, scope: RuleScope) -> Result<String, McpError> {
        let ids = self.store.available_scope_ids(scope).map_err(mcp_err)?;
        let list = ids
            .iter()
            .map(|id| format!("- {}", id))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(format!("Available {} ids:\n\n{}", scope, list))
    }

    pub fn search_text(&self, req: SearchRulesRequest) -> Result<String, McpError> {
        let query = SearchQuery {
            keyword: req.keyword,
            scope: req.scope,
            id: req.id,
        };
        self.store.search_rules(&query).map_err(mcp_err)
    }

    /// Text of an `assets://` or `rules://` resource.
    pub fn resource_text(&self, uri: &str) -> Result<String, McpError> {
        match ResourceUri::from_str(uri).map_err(mcp_err)? {
            ResourceUri::Asset(name) => self
                .store
                .load_asset(&name)
                .map(|asset| asset.content)
                .map_err(mcp_err),
            ResourceUri::Rules { scope, id } => {
                self.store.merged_rules(scope, &id).map_err(mcp_err)
            }
        }
    }

    pub fn resolve(&self, scope: RuleScope, id: &str) -> Result<ResolveScopeResponse, McpError> {
        let snapshot = self.store.snapshot().map_err(mcp_err)?;
        let resolved = snapshot.resolve_scope(scope, id);

        Ok(ResolveScopeResponse {
            scope: scope.to_string(),
            id: id.to_string(),
            resolved: resolved
                .iter()
                .map(|entry| ResolvedEntryInfo {
                    scope: entry.scope.to_string(),
                    id: entry.id.clone(),
                    has_rules: snapshot
                        .rules
                        .iter()
                        .any(|r| r.matches(entry.scope, &entry.id)),
                })
                .collect(),
        })
    }

    /// Every `assets://` and `rules://` resource, assets first.
    pub fn resources(&self) -> Result<Vec<Resource>, McpError> {
        let mut resources = Vec::new();

        for (name, asset) in self.store.available_assets().map_err(mcp_err)? {
            let mut raw = RawResource::new(ResourceUri::asset(&name), name.clone());
            raw.description = Some(format!("Bundled asset {}", name));
            raw.mime_type = Some(asset.mime_type.to_string());
            resources.push(raw.no_annotation());
        }

        for (scope, ids) in self.store.rule_scope_entries().map_err(mcp_err)? {
            for id in ids {
                let mut raw = RawResource::new(
                    ResourceUri::rules(scope, &id),
                    format!("{}-{}", scope, id),
                );
                raw.description = Some(format!("Rules for {} {}", scope, id));
                raw.mime_type = Some("text/markdown".to_string());
                resources.push(raw.no_annotation());
            }
        }

        Ok(resources)
    }
}

#[tool_router]
impl McpServer {
    #[tool(description = "Get detailed instructions on how to use this MCP server effectively")]
    async fn get_mcp_instructions(&self) -> Result<CallToolResult, McpError> {
        let text = self.instructions_text()?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "List all available identifiers for a scope")]
    async fn list_scope_ids(
        &self,
        params: Parameters<ListScopeIdsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.scope_ids_text(params.0.scope)?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        description = "Search for rules containing a specific keyword across all scopes. Provide scope and id together to search a single rule file."
    )]
    async fn search_rules(
        &self,
        params: Parameters<SearchRulesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.search_text(params.0)?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        description = "Load a resource by its URI (e.g., assets://name or rules://scope/id). Rules URIs return the merged rules of the scope including the global group and tech dependencies."
    )]
    async fn load_resource(
        &self,
        params: Parameters<LoadResourceRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.resource_text(&params.0.uri)?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        description = "Show which scopes apply to a scope id, in merge order. Returns each (scope, id) pair and whether a rule file exists for it."
    )]
    async fn resolve_scope(
        &self,
        params: Parameters<ResolveScopeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let result = self.resolve(req.scope, &req.id)?;

        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: rmcp::model::Implementation {
                name: "rulecast".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            instructions: Some(
                r#"Rulecast serves coding-assistant rules for projects.

Rules are organized by scope: project, group, tech and language. Reading
rules://project/<id> returns every rule that applies to the project merged
into one document: the global group, the project's groups, techs and
languages, techs those depend on, and the project's own rules.

- get_mcp_instructions: full usage guide
- list_scope_ids: ids known for a scope
- load_resource: read rules://scope/id or assets://name
- search_rules: find rules mentioning a keyword
- resolve_scope: see which scopes apply to an id and in which order"#
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(self.resources()?))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let text = self.resource_text(&request.uri)?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}

pub async fn run_stdio_server(store: RuleStore) -> anyhow::Result<()> {
    use tokio::io::{stdin, stdout};

    tracing::info!(rules_dir = %store.rules_dir().display(), "Starting MCP server via stdio");

    let service = McpServer::new(store);
    let server = service.serve((stdin(), stdout())).await?;

    let quit_reason = server.waiting().await?;
    tracing::info!("MCP server stopped: {:?}", quit_reason);

    Ok(())
}
