pub mod request;
pub mod response;

pub use request::{
    AddDocumentsParams, AtomicUpdateParams, ClientInfo, CommitParams, DeleteDocumentsParams,
    FastFindParams, FastSearchParams, InitializeParams, JsonRpcRequest, ListFieldsParams,
    QueryParams, RealtimeGetParams, RpcId, SchemaAddFieldParams, SchemaFieldParams,
    SchemaListFieldsParams, SelectParams, SemanticSelectParams, TermsParams, ToolCallParams,
    VectorSelectParams,
};
pub use response::{
    json_rpc_code, JsonRpcError, JsonRpcResponse, SolrErrorResponse, SolrToolError, ToolResult,
    ToolResultContent,
};
