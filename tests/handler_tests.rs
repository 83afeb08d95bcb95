//! Integration tests for the JSON-RPC dispatch layer.
//!
//! Tests exercise `handlers::dispatch` directly with a test ToolContext.
//! Paths that would reach Solr point at a closed port, so only handler
//! logic that fails before the wire is covered here; full round trips
//! live in client_tests.rs.

use std::path::PathBuf;
use std::time::Duration;

use serde_json::json;

use solr_mcp_server::config::SolrConfig;
use solr_mcp_server::handlers::{self, ToolContext};
use solr_mcp_server::protocol::{JsonRpcRequest, RpcId};

fn test_ctx() -> ToolContext {
    let config = SolrConfig {
        solr_base_url: "http://127.0.0.1:1".to_string(),
        timeout: Duration::from_secs(1),
        schema_cache_ttl: Duration::from_secs(300),
        ollama_base_url: "http://127.0.0.1:1".to_string(),
        ollama_model: "nomic-embed-text".to_string(),
        workspace_root: PathBuf::from("."),
    };
    ToolContext::new(config).unwrap()
}

fn request(id: i64, method: &str, params: Option<serde_json::Value>) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".into(),
        id: Some(RpcId::Number(id)),
        method: method.into(),
        params,
    }
}

fn tool_call(id: i64, name: &str, arguments: serde_json::Value) -> JsonRpcRequest {
    request(
        id,
        "tools/call",
        Some(json!({ "name": name, "arguments": arguments })),
    )
}

// ---------------------------------------------------------------------------
// Protocol surface
// ---------------------------------------------------------------------------

#[tokio::test]
async fn initialize_reports_server_info() {
    let ctx = test_ctx();
    let req = request(1, "initialize", Some(json!({"protocolVersion": "2024-11-05"})));

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    let result = resp.result.unwrap();
    assert_eq!(result["serverInfo"]["name"], "solr-mcp-server");
    assert_eq!(result["protocolVersion"], "2024-11-05");
}

#[tokio::test]
async fn initialized_notification_produces_no_response() {
    let ctx = test_ctx();
    let req = JsonRpcRequest {
        jsonrpc: "2.0".into(),
        id: None,
        method: "notifications/initialized".into(),
        params: None,
    };
    assert!(handlers::dispatch(&req, &ctx).await.is_none());
}

#[tokio::test]
async fn unknown_method_returns_method_not_found() {
    let ctx = test_ctx();
    let req = request(2, "resources/list", None);

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    assert_eq!(resp.error.unwrap().code, -32601);
}

#[tokio::test]
async fn tools_list_advertises_full_catalog() {
    let ctx = test_ctx();
    let req = request(3, "tools/list", None);

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    let result = resp.result.unwrap();
    let tools = result["tools"].as_array().unwrap();

    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    for expected in [
        "solr_list_collections",
        "solr_list_fields",
        "solr_select",
        "solr_vector_select",
        "solr_semantic_select",
        "get_default_text_vectorizer",
        "solr_query",
        "solr_terms",
        "solr_schema_add_field",
        "solr_schema_list_fields",
        "solr_schema_get_field",
        "solr_schema_delete_field",
        "solr_add_documents",
        "solr_delete_documents",
        "solr_commit",
        "solr_atomic_update",
        "solr_realtime_get",
        "fast_codebase_search",
        "fast_file_find",
    ] {
        assert!(names.contains(&expected), "missing tool: {expected}");
    }
    assert_eq!(tools.len(), 19);

    // Every advertised tool carries a usable input schema
    for tool in tools {
        assert!(tool["inputSchema"]["type"] == "object", "tool: {}", tool["name"]);
        assert!(tool["description"].as_str().is_some_and(|d| !d.is_empty()));
    }
}

// ---------------------------------------------------------------------------
// tools/call argument validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_tool_is_a_tool_error() {
    let ctx = test_ctx();
    let req = tool_call(4, "solr_drop_collection", json!({}));

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    let result = resp.result.unwrap();
    assert_eq!(result["isError"], true);
    assert!(result["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("Unknown tool"));
}

#[tokio::test]
async fn missing_required_argument_is_rejected_before_dispatch() {
    let ctx = test_ctx();
    // solr_list_fields requires "collection"
    let req = tool_call(5, "solr_list_fields", json!({}));

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    let result = resp.result.unwrap();
    assert_eq!(result["isError"], true);
    assert!(result["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("Invalid arguments for solr_list_fields"));
}

#[tokio::test]
async fn wrong_argument_type_is_rejected() {
    let ctx = test_ctx();
    let req = tool_call(6, "solr_vector_select", json!({
        "query": "SELECT * FROM docs",
        "vector": "not an array"
    }));

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    let result = resp.result.unwrap();
    assert_eq!(result["isError"], true);
}

#[tokio::test]
async fn tools_call_without_params_is_invalid() {
    let ctx = test_ctx();
    let req = request(7, "tools/call", None);

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    assert_eq!(resp.error.unwrap().code, -32602);
}

// ---------------------------------------------------------------------------
// Handler behavior reachable without a live cluster
// ---------------------------------------------------------------------------

#[tokio::test]
async fn select_with_non_select_statement_returns_parse_error_payload() {
    let ctx = test_ctx();
    let req = tool_call(8, "solr_select", json!({"query": "UPDATE docs SET a=1"}));

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    let result = resp.result.unwrap();
    assert_eq!(result["isError"], true);

    let text = result["content"][0]["text"].as_str().unwrap();
    let payload: serde_json::Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload["error"]["code"], "sql_parse_error");
    assert!(payload["error"]["message"].as_str().unwrap().contains("not a SELECT"));
}

#[tokio::test]
async fn delete_with_both_selectors_returns_indexing_error_payload() {
    let ctx = test_ctx();
    let req = tool_call(9, "solr_delete_documents", json!({
        "collection": "docs",
        "ids": ["1"],
        "query": "*:*"
    }));

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    let result = resp.result.unwrap();
    assert_eq!(result["isError"], true);

    let text = result["content"][0]["text"].as_str().unwrap();
    let payload: serde_json::Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload["error"]["code"], "indexing_error");
    assert!(payload["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Cannot specify both 'ids' and 'query'"));
}

#[tokio::test]
async fn unreachable_cluster_surfaces_connection_error_payload() {
    let ctx = test_ctx();
    let req = tool_call(10, "solr_list_collections", json!({}));

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    let result = resp.result.unwrap();
    assert_eq!(result["isError"], true);

    let text = result["content"][0]["text"].as_str().unwrap();
    let payload: serde_json::Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload["error"]["code"], "connection_error");
}

#[tokio::test]
async fn default_text_vectorizer_reports_configured_model() {
    let ctx = test_ctx();
    let req = tool_call(11, "get_default_text_vectorizer", json!({}));

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    let result = resp.result.unwrap();
    assert!(result["isError"].is_null() || result["isError"] == false);

    let text = result["content"][0]["text"].as_str().unwrap();
    let payload: serde_json::Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload["model"], "nomic-embed-text");
    assert_eq!(payload["vector_dimension"], 768);
}

#[tokio::test]
async fn fast_file_find_falls_back_to_local_scan() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("notes.md"), "hello").unwrap();
    std::fs::write(tmp.path().join("main.rs"), "fn main() {}").unwrap();

    let config = SolrConfig {
        solr_base_url: "http://127.0.0.1:1".to_string(),
        timeout: Duration::from_secs(1),
        schema_cache_ttl: Duration::from_secs(300),
        ollama_base_url: "http://127.0.0.1:1".to_string(),
        ollama_model: "nomic-embed-text".to_string(),
        workspace_root: tmp.path().to_path_buf(),
    };
    let ctx = ToolContext::new(config).unwrap();

    let req = tool_call(12, "fast_file_find", json!({"name_pattern": "*.md"}));
    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    let result = resp.result.unwrap();

    let text = result["content"][0]["text"].as_str().unwrap();
    let payload: serde_json::Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload["search_method"], "local");
    assert_eq!(payload["num_found"], 1);
    assert_eq!(payload["docs"][0]["file_name"], "notes.md");
}
