pub mod collections;
pub mod documents;
pub mod query;
pub mod schema;
pub mod select;
pub mod workspace;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::config::SolrConfig;
use crate::protocol::{
    InitializeParams, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ToolCallParams, ToolResult,
};
use crate::solr::SolrClient;

/// Shared state handed to every tool handler.
pub struct ToolContext {
    pub config: SolrConfig,
    pub client: SolrClient,
}

impl ToolContext {
    pub fn new(config: SolrConfig) -> Result<Self, crate::solr::SolrError> {
        let client = SolrClient::new(&config)?;
        Ok(Self { config, client })
    }
}

/// Full tool catalog advertised by `tools/list`.
pub fn catalog() -> Vec<Value> {
    let mut tools = Vec::new();
    tools.extend(collections::tools());
    tools.extend(select::tools());
    tools.extend(query::tools());
    tools.extend(schema::tools());
    tools.extend(documents::tools());
    tools.extend(workspace::tools());
    tools
}

/// Dispatch a JSON-RPC request to the appropriate handler.
///
/// Returns `None` for notifications (no response required).
pub async fn dispatch(req: &JsonRpcRequest, ctx: &ToolContext) -> Option<JsonRpcResponse> {
    match req.method.as_str() {
        "initialize" => {
            if let Some(params) = req
                .params
                .clone()
                .and_then(|v| serde_json::from_value::<InitializeParams>(v).ok())
            {
                let client = params.client_info.as_ref();
                tracing::info!(
                    client = client.and_then(|c| c.name.as_deref()).unwrap_or("unknown"),
                    version = client.and_then(|c| c.version.as_deref()).unwrap_or(""),
                    protocol = params.protocol_version.as_deref().unwrap_or(""),
                    "initialize"
                );
            }
            let result = json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "solr-mcp-server",
                    "version": env!("CARGO_PKG_VERSION")
                }
            });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "notifications/initialized" => None,

        "ping" => Some(JsonRpcResponse::success(req.id.clone(), json!({}))),

        "tools/list" => Some(JsonRpcResponse::success(
            req.id.clone(),
            json!({ "tools": catalog() }),
        )),

        "tools/call" => {
            let params: ToolCallParams = match &req.params {
                Some(v) => match serde_json::from_value(v.clone()) {
                    Ok(p) => p,
                    Err(e) => {
                        return Some(JsonRpcResponse::error(
                            req.id.clone(),
                            JsonRpcError::invalid_params(format!(
                                "Invalid tools/call params: {e}"
                            )),
                        ));
                    }
                },
                None => {
                    return Some(JsonRpcResponse::error(
                        req.id.clone(),
                        JsonRpcError::invalid_params("Missing params for tools/call"),
                    ));
                }
            };

            let tool_result = dispatch_tool_call(&params, ctx).await;
            match serde_json::to_value(&tool_result) {
                Ok(result_json) => Some(JsonRpcResponse::success(req.id.clone(), result_json)),
                Err(e) => Some(JsonRpcResponse::error(
                    req.id.clone(),
                    JsonRpcError::internal_error(format!("Failed to serialize tool result: {e}")),
                )),
            }
        }

        _ => Some(JsonRpcResponse::error(
            req.id.clone(),
            JsonRpcError::method_not_found(&req.method),
        )),
    }
}

/// Route a `tools/call` to its handler after validating the arguments
/// against the tool's declared input schema.
pub async fn dispatch_tool_call(params: &ToolCallParams, ctx: &ToolContext) -> ToolResult {
    let Some(descriptor) = catalog()
        .into_iter()
        .find(|t| t["name"].as_str() == Some(params.name.as_str()))
    else {
        return ToolResult::error(format!("Unknown tool: {}", params.name));
    };

    let args = params
        .arguments
        .clone()
        .unwrap_or_else(|| Value::Object(Default::default()));

    if let Err(e) = crate::schema::validate_instance(&descriptor["inputSchema"], &args) {
        return ToolResult::error(format!(
            "Invalid arguments for {}: {e}",
            params.name
        ));
    }

    match params.name.as_str() {
        "solr_list_collections" => collections::list_collections(ctx).await,
        "solr_list_fields" => {
            run(&params.name, args, |p| collections::list_fields(p, ctx)).await
        }

        "solr_select" => run(&params.name, args, |p| select::select(p, ctx)).await,
        "solr_vector_select" => {
            run(&params.name, args, |p| select::vector_select(p, ctx)).await
        }
        "solr_semantic_select" => {
            run(&params.name, args, |p| select::semantic_select(p, ctx)).await
        }
        "get_default_text_vectorizer" => select::default_text_vectorizer(ctx).await,

        "solr_query" => run(&params.name, args, |p| query::standard_query(p, ctx)).await,
        "solr_terms" => run(&params.name, args, |p| query::terms(p, ctx)).await,

        "solr_schema_add_field" => run(&params.name, args, |p| schema::add_field(p, ctx)).await,
        "solr_schema_list_fields" => {
            run(&params.name, args, |p| schema::list_fields(p, ctx)).await
        }
        "solr_schema_get_field" => run(&params.name, args, |p| schema::get_field(p, ctx)).await,
        "solr_schema_delete_field" => {
            run(&params.name, args, |p| schema::delete_field(p, ctx)).await
        }

        "solr_add_documents" => run(&params.name, args, |p| documents::add(p, ctx)).await,
        "solr_delete_documents" => run(&params.name, args, |p| documents::delete(p, ctx)).await,
        "solr_commit" => run(&params.name, args, |p| documents::commit(p, ctx)).await,
        "solr_atomic_update" => {
            run(&params.name, args, |p| documents::atomic_update(p, ctx)).await
        }
        "solr_realtime_get" => run(&params.name, args, |p| documents::realtime_get(p, ctx)).await,

        "fast_codebase_search" => run(&params.name, args, |p| workspace::search(p, ctx)).await,
        "fast_file_find" => run(&params.name, args, |p| workspace::find(p, ctx)).await,

        _ => ToolResult::error(format!("Unknown tool: {}", params.name)),
    }
}

/// Deserialize the validated arguments and invoke the handler.
async fn run<P, F, Fut>(name: &str, args: Value, handler: F) -> ToolResult
where
    P: DeserializeOwned,
    F: FnOnce(P) -> Fut,
    Fut: std::future::Future<Output = ToolResult>,
{
    match serde_json::from_value::<P>(args) {
        Ok(parsed) => handler(parsed).await,
        Err(e) => ToolResult::error(format!("Invalid arguments for {name}: {e}")),
    }
}
