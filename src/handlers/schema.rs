//! Schema API field management tools.

use serde_json::{json, Value};

use crate::protocol::{SchemaAddFieldParams, SchemaFieldParams, SchemaListFieldsParams, ToolResult};
use crate::solr::FieldDefinition;

use super::ToolContext;

pub fn tools() -> Vec<Value> {
    vec![
        json!({
            "name": "solr_schema_add_field",
            "description": "Add a field to a collection's schema",
            "inputSchema": {
                "type": "object",
                "required": ["collection", "field_name", "field_type"],
                "properties": {
                    "collection": { "type": "string" },
                    "field_name": { "type": "string" },
                    "field_type": {
                        "type": "string",
                        "description": "Schema field type name, e.g. string, text_general, pint, knn_vector"
                    },
                    "stored": { "type": "boolean", "description": "Store the original value (default true)" },
                    "indexed": { "type": "boolean", "description": "Make the field searchable (default true)" },
                    "required": { "type": "boolean" },
                    "multi_valued": { "type": "boolean" },
                    "doc_values": {
                        "type": "boolean",
                        "description": "Enable DocValues. Required for fields used in SQL queries."
                    }
                }
            }
        }),
        json!({
            "name": "solr_schema_list_fields",
            "description": "List all schema field definitions of a collection",
            "inputSchema": {
                "type": "object",
                "required": ["collection"],
                "properties": {
                    "collection": { "type": "string" }
                }
            }
        }),
        json!({
            "name": "solr_schema_get_field",
            "description": "Fetch a single schema field definition",
            "inputSchema": {
                "type": "object",
                "required": ["collection", "field_name"],
                "properties": {
                    "collection": { "type": "string" },
                    "field_name": { "type": "string" }
                }
            }
        }),
        json!({
            "name": "solr_schema_delete_field",
            "description": "Delete a field from a collection's schema",
            "inputSchema": {
                "type": "object",
                "required": ["collection", "field_name"],
                "properties": {
                    "collection": { "type": "string" },
                    "field_name": { "type": "string" }
                }
            }
        }),
    ]
}

pub async fn add_field(params: SchemaAddFieldParams, ctx: &ToolContext) -> ToolResult {
    let def = FieldDefinition {
        name: params.field_name,
        field_type: params.field_type,
        stored: params.stored,
        indexed: params.indexed,
        required: params.required,
        multi_valued: params.multi_valued,
        doc_values: params.doc_values,
    };
    match ctx.client.add_schema_field(&params.collection, &def).await {
        Ok(result) => ToolResult::json(&result),
        Err(e) => e.into(),
    }
}

pub async fn list_fields(params: SchemaListFieldsParams, ctx: &ToolContext) -> ToolResult {
    match ctx.client.get_schema_fields(&params.collection).await {
        Ok(result) => ToolResult::json(&result),
        Err(e) => e.into(),
    }
}

pub async fn get_field(params: SchemaFieldParams, ctx: &ToolContext) -> ToolResult {
    match ctx
        .client
        .get_schema_field(&params.collection, &params.field_name)
        .await
    {
        Ok(result) => ToolResult::json(&result),
        Err(e) => e.into(),
    }
}

pub async fn delete_field(params: SchemaFieldParams, ctx: &ToolContext) -> ToolResult {
    match ctx
        .client
        .delete_schema_field(&params.collection, &params.field_name)
        .await
    {
        Ok(result) => ToolResult::json(&result),
        Err(e) => e.into(),
    }
}
