use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON-RPC 2.0 request ID, which may be a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(i64),
    Str(String),
}

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<RpcId>,
    pub method: String,
    pub params: Option<Value>,
}

/// MCP `initialize` params.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: Option<String>,
    #[serde(rename = "clientInfo")]
    pub client_info: Option<ClientInfo>,
}

/// Client information sent during `initialize`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInfo {
    pub name: Option<String>,
    pub version: Option<String>,
}

/// Parameters for `tools/call`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    pub arguments: Option<Value>,
}

// ---------------------------------------------------------------------------
// Per-tool argument structs
// ---------------------------------------------------------------------------

/// Arguments for `solr_select`.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectParams {
    pub query: String,
}

/// Arguments for `solr_vector_select`.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorSelectParams {
    pub query: String,
    pub vector: Vec<f64>,
    pub field: Option<String>,
}

/// Arguments for `solr_semantic_select`.
#[derive(Debug, Clone, Deserialize)]
pub struct SemanticSelectParams {
    pub query: String,
    pub text: String,
    pub field: Option<String>,
    pub model: Option<String>,
}

/// Arguments for `solr_list_fields`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListFieldsParams {
    pub collection: String,
}

/// Arguments for `solr_query`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryParams {
    pub collection: String,
    #[serde(default = "default_match_all")]
    pub q: String,
    #[serde(default)]
    pub fq: Vec<String>,
    pub fl: Option<String>,
    #[serde(default = "default_rows")]
    pub rows: u64,
    #[serde(default)]
    pub start: u64,
    pub sort: Option<String>,
    #[serde(default)]
    pub highlight_fields: Vec<String>,
    #[serde(default = "default_highlight_snippets")]
    pub highlight_snippets: u64,
    #[serde(default = "default_highlight_fragsize")]
    pub highlight_fragsize: u64,
    #[serde(default = "default_highlight_method")]
    pub highlight_method: String,
    #[serde(default)]
    pub stats_fields: Vec<String>,
}

/// Arguments for `solr_terms`.
#[derive(Debug, Clone, Deserialize)]
pub struct TermsParams {
    pub collection: String,
    pub field: String,
    pub prefix: Option<String>,
    pub regex: Option<String>,
    #[serde(default = "default_rows")]
    pub limit: u64,
    #[serde(default = "default_min_count")]
    pub min_count: u64,
    pub max_count: Option<u64>,
}

/// Arguments for `solr_schema_add_field`.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaAddFieldParams {
    pub collection: String,
    pub field_name: String,
    pub field_type: String,
    #[serde(default = "default_true")]
    pub stored: bool,
    #[serde(default = "default_true")]
    pub indexed: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub multi_valued: bool,
    pub doc_values: Option<bool>,
}

/// Arguments for `solr_schema_list_fields`.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaListFieldsParams {
    pub collection: String,
}

/// Arguments for `solr_schema_get_field` and `solr_schema_delete_field`.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaFieldParams {
    pub collection: String,
    pub field_name: String,
}

/// Arguments for `solr_add_documents`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddDocumentsParams {
    pub collection: String,
    pub documents: Vec<Value>,
    #[serde(default = "default_true")]
    pub commit: bool,
    pub commit_within: Option<u64>,
    #[serde(default = "default_true")]
    pub overwrite: bool,
}

/// Arguments for `solr_delete_documents`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteDocumentsParams {
    pub collection: String,
    pub ids: Option<Vec<String>>,
    pub query: Option<String>,
    #[serde(default = "default_true")]
    pub commit: bool,
}

/// Arguments for `solr_commit`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitParams {
    pub collection: String,
    #[serde(default)]
    pub soft: bool,
    #[serde(default = "default_true")]
    pub wait_searcher: bool,
    #[serde(default)]
    pub expunge_deletes: bool,
}

/// Arguments for `solr_atomic_update`.
#[derive(Debug, Clone, Deserialize)]
pub struct AtomicUpdateParams {
    pub collection: String,
    pub doc_id: String,
    pub updates: Map<String, Value>,
    pub version: Option<i64>,
    #[serde(default)]
    pub commit: bool,
    pub commit_within: Option<u64>,
}

/// Arguments for `solr_realtime_get`.
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeGetParams {
    pub collection: String,
    pub doc_ids: Vec<String>,
    pub fl: Option<String>,
}

/// Arguments for `fast_codebase_search`.
#[derive(Debug, Clone, Deserialize)]
pub struct FastSearchParams {
    pub pattern: String,
    pub file_type: Option<String>,
    #[serde(default = "default_codebase_collection")]
    pub collection: String,
    #[serde(default = "default_max_results")]
    pub max_results: u64,
    #[serde(default = "default_true")]
    pub use_highlighting: bool,
}

/// Arguments for `fast_file_find`.
#[derive(Debug, Clone, Deserialize)]
pub struct FastFindParams {
    pub name_pattern: String,
    pub file_type: Option<String>,
    #[serde(default = "default_codebase_collection")]
    pub collection: String,
    #[serde(default = "default_max_results")]
    pub max_results: u64,
}

fn default_match_all() -> String {
    "*:*".to_string()
}

fn default_rows() -> u64 {
    10
}

fn default_min_count() -> u64 {
    1
}

fn default_highlight_snippets() -> u64 {
    3
}

fn default_highlight_fragsize() -> u64 {
    100
}

fn default_highlight_method() -> String {
    "unified".to_string()
}

fn default_true() -> bool {
    true
}

fn default_codebase_collection() -> String {
    "codebase".to_string()
}

fn default_max_results() -> u64 {
    100
}
