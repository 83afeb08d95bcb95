use serde_json::{json, Value};

use crate::protocol::{ListFieldsParams, ToolResult};

use super::ToolContext;

pub fn tools() -> Vec<Value> {
    vec![
        json!({
            "name": "solr_list_collections",
            "description": "List all collections available on the Solr cluster",
            "inputSchema": {
                "type": "object",
                "properties": {}
            }
        }),
        json!({
            "name": "solr_list_fields",
            "description": "List all schema fields of a collection with their properties (type, indexed, stored, multiValued, docValues)",
            "inputSchema": {
                "type": "object",
                "required": ["collection"],
                "properties": {
                    "collection": {
                        "type": "string",
                        "description": "Collection name"
                    }
                }
            }
        }),
    ]
}

/// Handle a `solr_list_collections` tool call.
pub async fn list_collections(ctx: &ToolContext) -> ToolResult {
    match ctx.client.list_collections().await {
        Ok(collections) => ToolResult::json(&json!({
            "count": collections.len(),
            "collections": collections,
        })),
        Err(e) => e.into(),
    }
}

/// Handle a `solr_list_fields` tool call.
pub async fn list_fields(params: ListFieldsParams, ctx: &ToolContext) -> ToolResult {
    match ctx.client.list_fields(&params.collection).await {
        Ok(fields) => ToolResult::json(&json!({
            "collection": params.collection,
            "fields": fields,
        })),
        Err(e) => e.into(),
    }
}
