//! MCP protocol integration tests.
//!
//! These tests spawn the actual `rulecast mcp` process over a temporary rule
//! tree and talk JSON-RPC over stdio.
//!
//! The rmcp library uses line-delimited JSON (each message is one line):
//! ```text
//! {"jsonrpc":"2.0","id":1,"method":"initialize",...}\n
//! {"jsonrpc":"2.0","id":1,"result":{...}}\n
//! ```

mod common;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};
use tempfile::TempDir;

/// JSON-RPC 2.0 request
#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: &'static str,
    id: u64,
    method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: Option<u64>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct JsonRpcError {
    code: i64,
    message: String,
    data: Option<Value>,
}

/// MCP test client that spawns and communicates with the server
struct McpTestClient {
    child: Child,
    request_id: u64,
    reader: BufReader<std::process::ChildStdout>,
    _rules: TempDir,
}

impl McpTestClient {
    /// Spawn a stdio server over a fresh fixture rule tree
    fn spawn() -> Self {
        let rules = common::rule_tree();

        let mut child = Command::new(env!("CARGO_BIN_EXE_rulecast"))
            .arg("mcp")
            .env("RULES_DIR", rules.path())
            .env_remove("RULES_MANIFEST")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to spawn rulecast mcp");

        let stdout = child.stdout.take().expect("Failed to get stdout");
        let reader = BufReader::new(stdout);

        Self {
            child,
            request_id: 0,
            reader,
            _rules: rules,
        }
    }

    /// Send a message as line-delimited JSON
    fn send_message(&mut self, content: &str) {
        let stdin = self.child.stdin.as_mut().expect("Failed to get stdin");
        writeln!(stdin, "{}", content).expect("Failed to write message");
        stdin.flush().expect("Failed to flush stdin");
    }

    /// Read a message as line-delimited JSON
    fn read_message(&mut self) -> String {
        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .expect("Failed to read line");
        line.trim().to_string()
    }

    /// Send a JSON-RPC request and get the response
    fn request(&mut self, method: &str, params: Option<Value>) -> JsonRpcResponse {
        self.request_id += 1;
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.request_id,
            method: method.to_string(),
            params,
        };

        let request_json = serde_json::to_string(&request).expect("Failed to serialize request");
        self.send_message(&request_json);

        let response_json = self.read_message();
        serde_json::from_str(&response_json).expect("Failed to parse response")
    }

    /// Send initialize request and initialized notification (required first messages)
    fn initialize(&mut self) -> JsonRpcResponse {
        let response = self.request(
            "initialize",
            Some(json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {
                    "name": "test-client",
                    "version": "1.0.0"
                }
            })),
        );

        let notification = json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        });
        self.send_message(&notification.to_string());

        response
    }

    fn call_tool(&mut self, name: &str, arguments: Value) -> JsonRpcResponse {
        self.request(
            "tools/call",
            Some(json!({
                "name": name,
                "arguments": arguments
            })),
        )
    }
}

impl Drop for McpTestClient {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn extract_text_content(response: &JsonRpcResponse) -> String {
    response
        .result
        .as_ref()
        .and_then(|r| r.get("content"))
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|c| c.get("text"))
        .and_then(|t| t.as_str())
        .expect("Expected text content")
        .to_string()
}

// ============================================================
// Protocol Tests
// ============================================================

mod protocol {
    use super::*;

    #[test]
    fn initialize_returns_server_info() {
        let mut client = McpTestClient::spawn();
        let response = client.initialize();

        assert!(response.error.is_none(), "Expected success, got error");
        let result = response.result.expect("Expected result");

        assert_eq!(result["serverInfo"]["name"], "rulecast");
        assert!(result["capabilities"].get("tools").is_some());
        assert!(result["capabilities"].get("resources").is_some());
    }

    #[test]
    fn tools_list_returns_all_tools() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.request("tools/list", None);
        assert!(response.error.is_none(), "Expected success, got error");

        let result = response.result.expect("Expected result");
        let tools = result["tools"].as_array().expect("Tools should be array");

        let mut tool_names: Vec<&str> = tools
            .iter()
            .filter_map(|t| t.get("name").and_then(|n| n.as_str()))
            .collect();
        tool_names.sort_unstable();

        assert_eq!(
            tool_names,
            vec![
                "get_mcp_instructions",
                "list_scope_ids",
                "load_resource",
                "resolve_scope",
                "search_rules",
            ]
        );

        for tool in tools {
            assert!(tool.get("description").is_some());
            assert!(tool.get("inputSchema").is_some());
        }
    }

    #[test]
    fn resources_list_includes_rules_and_assets() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.request("resources/list", None);
        assert!(response.error.is_none(), "Expected success, got error");

        let result = response.result.expect("Expected result");
        let uris: Vec<&str> = result["resources"]
            .as_array()
            .expect("Resources should be array")
            .iter()
            .filter_map(|r| r["uri"].as_str())
            .collect();

        assert!(uris.contains(&"assets://assets/checklist.txt"));
        assert!(uris.contains(&"rules://project/web-app"));
        assert!(uris.contains(&"rules://tech/javascript"));
    }

    #[test]
    fn resources_read_returns_merged_rules() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.request(
            "resources/read",
            Some(json!({ "uri": "rules://project/web-app" })),
        );
        assert!(response.error.is_none(), "Expected success, got error");

        let result = response.result.expect("Expected result");
        let contents = &result["contents"][0];
        assert_eq!(contents["uri"], "rules://project/web-app");
        let text = contents["text"].as_str().expect("Expected text");
        assert!(text.starts_with("# Global"));
        assert!(text.contains("# TypeScript"));
    }
}

// ============================================================
// Tool Call Tests
// ============================================================

mod tool_calls {
    use super::*;

    #[test]
    fn list_scope_ids_lists_projects() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.call_tool("list_scope_ids", json!({ "scope": "project" }));
        assert!(response.error.is_none(), "Expected success, got error");

        assert_eq!(
            extract_text_content(&response),
            "Available project ids:\n\n- docs-site\n- web-app"
        );
    }

    #[test]
    fn load_resource_returns_rules() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.call_tool("load_resource", json!({ "uri": "rules://tech/react" }));
        assert!(response.error.is_none(), "Expected success, got error");

        let text = extract_text_content(&response);
        assert!(text.contains("# React"));
        assert!(text.contains("# JavaScript"));
    }

    #[test]
    fn search_rules_within_scope() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.call_tool(
            "search_rules",
            json!({ "keyword": "strict", "scope": "language", "id": "typescript" }),
        );
        assert!(response.error.is_none(), "Expected success, got error");

        let text = extract_text_content(&response);
        assert!(text.starts_with("Found 1 rule(s) containing \"strict\" in language/typescript:"));
    }

    #[test]
    fn resolve_scope_returns_json() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.call_tool("resolve_scope", json!({ "scope": "tech", "id": "react" }));
        assert!(response.error.is_none(), "Expected success, got error");

        let body: Value =
            serde_json::from_str(&extract_text_content(&response)).expect("Expected JSON in text");
        let ids: Vec<&str> = body["resolved"]
            .as_array()
            .expect("Expected resolved array")
            .iter()
            .filter_map(|e| e["id"].as_str())
            .collect();
        assert_eq!(ids, vec!["global", "react", "javascript"]);
    }

    #[test]
    fn unknown_scope_is_rejected() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.call_tool("load_resource", json!({ "uri": "rules://team/core" }));
        let error = response.error.expect("Expected error");
        assert_eq!(error.code, -32602);
        assert!(error.message.contains("Invalid scope: team"));
    }

    #[test]
    fn search_without_id_is_rejected() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.call_tool("search_rules", json!({ "keyword": "x", "scope": "tech" }));
        let error = response.error.expect("Expected error");
        assert_eq!(error.code, -32602);
    }
}
