use serde::{Deserialize, Serialize};

use super::request::RpcId;
use crate::solr::error::{SolrError, SolrErrorCode};

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 response layer
// ---------------------------------------------------------------------------

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RpcId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<RpcId>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<RpcId>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC 2.0 error object (protocol-level errors).
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcError {
    pub fn parse_error() -> Self {
        Self { code: -32700, message: "Parse error".into(), data: None }
    }

    pub fn invalid_request() -> Self {
        Self { code: -32600, message: "Invalid Request".into(), data: None }
    }

    pub fn invalid_request_with(detail: impl Into<String>) -> Self {
        Self { code: -32600, message: detail.into(), data: None }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {method}"),
            data: None,
        }
    }

    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self { code: -32602, message: detail.into(), data: None }
    }

    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self { code: -32603, message: detail.into(), data: None }
    }
}

// ---------------------------------------------------------------------------
// MCP tool result layer (returned inside a *successful* JSON-RPC response)
// ---------------------------------------------------------------------------

/// MCP tool call result wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub content: Vec<ToolResultContent>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

/// A single content block inside a tool result.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResultContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolResultContent {
                content_type: "text".into(),
                text: text.into(),
            }],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolResultContent {
                content_type: "text".into(),
                text: text.into(),
            }],
            is_error: true,
        }
    }

    /// Serialize a successful payload as a JSON text block.
    pub fn json(value: &serde_json::Value) -> Self {
        match serde_json::to_string(value) {
            Ok(text) => Self::text(text),
            Err(e) => Self::error(format!("Failed to serialize result: {e}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Structured Solr error payloads (carried inside ToolResult text)
// ---------------------------------------------------------------------------

/// Structured error object surfaced to agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolrToolError {
    pub code: SolrErrorCode,
    pub message: String,
}

/// Top-level structured error payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolrErrorResponse {
    pub error: SolrToolError,
}

impl SolrErrorResponse {
    pub fn new(code: SolrErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: SolrToolError {
                code,
                message: message.into(),
            },
        }
    }
}

impl From<&SolrError> for SolrErrorResponse {
    fn from(err: &SolrError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

/// Map a Solr error code to the closest JSON-RPC 2.0 error code.
///
/// Client-side input failures → -32602 (Invalid params)
/// Server-side failures       → -32603 (Internal error)
pub fn json_rpc_code(code: SolrErrorCode) -> i32 {
    match code {
        SolrErrorCode::SqlParseError
        | SolrErrorCode::NoVectorField
        | SolrErrorCode::IndexingError => -32602,
        SolrErrorCode::ConnectionError
        | SolrErrorCode::SqlExecutionError
        | SolrErrorCode::DocvaluesError
        | SolrErrorCode::SchemaError
        | SolrErrorCode::QueryError
        | SolrErrorCode::SolrError => -32603,
    }
}

/// Convert a structured Solr error into a JSON-RPC error, carrying the full
/// payload in `data` for structured clients.
impl From<SolrErrorResponse> for JsonRpcError {
    fn from(resp: SolrErrorResponse) -> Self {
        let data = serde_json::to_value(&resp).ok();
        Self {
            code: json_rpc_code(resp.error.code),
            message: resp.error.message,
            data,
        }
    }
}

/// Convert a structured Solr error into a tool result with `isError: true`.
/// The text content is the JSON-serialized payload, so clients that inspect
/// tool output still get the typed code.
impl From<SolrErrorResponse> for ToolResult {
    fn from(resp: SolrErrorResponse) -> Self {
        match serde_json::to_string(&resp) {
            Ok(json) => Self::error(json),
            Err(_) => Self::error(resp.error.message),
        }
    }
}

impl From<SolrError> for ToolResult {
    fn from(err: SolrError) -> Self {
        SolrErrorResponse::from(&err).into()
    }
}
