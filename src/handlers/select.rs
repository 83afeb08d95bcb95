//! SQL select tools, including the vector-filtered and semantic variants.

use serde_json::{json, Value};

use crate::protocol::{SelectParams, SemanticSelectParams, ToolResult, VectorSelectParams};

use super::ToolContext;

pub fn tools() -> Vec<Value> {
    vec![
        json!({
            "name": "solr_select",
            "description": "Execute a SQL SELECT statement against a Solr collection via the SQL endpoint",
            "inputSchema": {
                "type": "object",
                "required": ["query"],
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "SQL SELECT statement, e.g. SELECT id, title FROM docs WHERE status = 'active' LIMIT 20"
                    }
                }
            }
        }),
        json!({
            "name": "solr_vector_select",
            "description": "Execute a SQL SELECT restricted to the documents most similar to a raw embedding vector. Runs a KNN search first, then rewrites the statement with an id IN (...) predicate.",
            "inputSchema": {
                "type": "object",
                "required": ["query", "vector"],
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "SQL SELECT statement to filter"
                    },
                    "vector": {
                        "type": "array",
                        "items": { "type": "number" },
                        "description": "Query embedding; dimension must match the collection's vector field"
                    },
                    "field": {
                        "type": "string",
                        "description": "Dense vector field to search. Auto-detected from the schema when omitted."
                    }
                }
            }
        }),
        json!({
            "name": "solr_semantic_select",
            "description": "Execute a SQL SELECT restricted to the documents semantically closest to a text query. The text is embedded via the configured vectorizer, then handled like solr_vector_select.",
            "inputSchema": {
                "type": "object",
                "required": ["query", "text"],
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "SQL SELECT statement to filter"
                    },
                    "text": {
                        "type": "string",
                        "description": "Natural-language text to embed and search for"
                    },
                    "field": {
                        "type": "string",
                        "description": "Dense vector field to search. Auto-detected from the schema when omitted."
                    },
                    "model": {
                        "type": "string",
                        "description": "Embedding model override. Defaults to the configured model."
                    }
                }
            }
        }),
        json!({
            "name": "get_default_text_vectorizer",
            "description": "Report the embedding model used by solr_semantic_select, with its vector dimension",
            "inputSchema": {
                "type": "object",
                "properties": {}
            }
        }),
    ]
}

pub async fn select(params: SelectParams, ctx: &ToolContext) -> ToolResult {
    match ctx.client.execute_select_query(&params.query).await {
        Ok(result) => ToolResult::json(&result),
        Err(e) => e.into(),
    }
}

pub async fn vector_select(params: VectorSelectParams, ctx: &ToolContext) -> ToolResult {
    match ctx
        .client
        .execute_vector_select_query(&params.query, &params.vector, params.field.as_deref())
        .await
    {
        Ok(result) => ToolResult::json(&result),
        Err(e) => e.into(),
    }
}

pub async fn semantic_select(params: SemanticSelectParams, ctx: &ToolContext) -> ToolResult {
    match ctx
        .client
        .execute_semantic_select_query(
            &params.query,
            &params.text,
            params.field.as_deref(),
            params.model.as_deref(),
        )
        .await
    {
        Ok(result) => ToolResult::json(&result),
        Err(e) => e.into(),
    }
}

pub async fn default_text_vectorizer(ctx: &ToolContext) -> ToolResult {
    let provider = ctx.client.vector_provider();
    ToolResult::json(&json!({
        "vectorizer": format!("ollama/{}", provider.model()),
        "model": provider.model(),
        "base_url": provider.base_url(),
        "vector_dimension": provider.dimension(),
    }))
}
