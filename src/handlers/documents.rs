//! Document lifecycle tools: indexing, deletion, commits, atomic updates,
//! and real-time gets.

use serde_json::{json, Value};

use crate::protocol::{
    AddDocumentsParams, AtomicUpdateParams, CommitParams, DeleteDocumentsParams, RealtimeGetParams,
    ToolResult,
};

use super::ToolContext;

pub fn tools() -> Vec<Value> {
    vec![
        json!({
            "name": "solr_add_documents",
            "description": "Add or update a batch of JSON documents in a collection",
            "inputSchema": {
                "type": "object",
                "required": ["collection", "documents"],
                "properties": {
                    "collection": { "type": "string" },
                    "documents": {
                        "type": "array",
                        "items": { "type": "object" },
                        "minItems": 1,
                        "description": "Documents to index. Each should carry an 'id' field."
                    },
                    "commit": { "type": "boolean", "description": "Hard commit immediately (default true)" },
                    "commit_within": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Commit within this many milliseconds instead of immediately"
                    },
                    "overwrite": { "type": "boolean", "description": "Replace documents with duplicate IDs (default true)" }
                }
            }
        }),
        json!({
            "name": "solr_delete_documents",
            "description": "Delete documents by ID list or by query. Exactly one of 'ids' and 'query' must be given.",
            "inputSchema": {
                "type": "object",
                "required": ["collection"],
                "properties": {
                    "collection": { "type": "string" },
                    "ids": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Document IDs to delete"
                    },
                    "query": {
                        "type": "string",
                        "description": "Delete-by-query in Lucene syntax, e.g. status:obsolete"
                    },
                    "commit": { "type": "boolean", "description": "Commit immediately (default true)" }
                }
            }
        }),
        json!({
            "name": "solr_commit",
            "description": "Commit pending changes to a collection, either soft (visible) or hard (durable)",
            "inputSchema": {
                "type": "object",
                "required": ["collection"],
                "properties": {
                    "collection": { "type": "string" },
                    "soft": { "type": "boolean", "description": "Soft commit: make changes searchable without flushing to disk" },
                    "wait_searcher": { "type": "boolean", "description": "Block until the new searcher is registered (default true)" },
                    "expunge_deletes": { "type": "boolean", "description": "Merge away deleted documents during the commit" }
                }
            }
        }),
        json!({
            "name": "solr_atomic_update",
            "description": "Atomically update fields of one document without reindexing it. Supports set, add, remove, removeregex, inc, and set-if-null operations, with optional optimistic concurrency via _version_.",
            "inputSchema": {
                "type": "object",
                "required": ["collection", "doc_id", "updates"],
                "properties": {
                    "collection": { "type": "string" },
                    "doc_id": { "type": "string" },
                    "updates": {
                        "type": "object",
                        "minProperties": 1,
                        "description": "Map of field name to operation object, e.g. {\"price\": {\"set\": 29.99}, \"stock\": {\"inc\": -5}}"
                    },
                    "version": {
                        "type": "integer",
                        "description": "Expected _version_ of the document; the update fails on mismatch"
                    },
                    "commit": { "type": "boolean" },
                    "commit_within": { "type": "integer", "minimum": 1 }
                }
            }
        }),
        json!({
            "name": "solr_realtime_get",
            "description": "Fetch documents by ID in real time, including uncommitted changes",
            "inputSchema": {
                "type": "object",
                "required": ["collection", "doc_ids"],
                "properties": {
                    "collection": { "type": "string" },
                    "doc_ids": {
                        "type": "array",
                        "items": { "type": "string" },
                        "minItems": 1
                    },
                    "fl": { "type": "string", "description": "Comma-separated field list to return" }
                }
            }
        }),
    ]
}

pub async fn add(params: AddDocumentsParams, ctx: &ToolContext) -> ToolResult {
    match ctx
        .client
        .add_documents(
            &params.collection,
            &params.documents,
            params.commit,
            params.commit_within,
            params.overwrite,
        )
        .await
    {
        Ok(result) => ToolResult::json(&result),
        Err(e) => e.into(),
    }
}

pub async fn delete(params: DeleteDocumentsParams, ctx: &ToolContext) -> ToolResult {
    match ctx
        .client
        .delete_documents(
            &params.collection,
            params.ids.as_deref(),
            params.query.as_deref(),
            params.commit,
        )
        .await
    {
        Ok(result) => ToolResult::json(&result),
        Err(e) => e.into(),
    }
}

pub async fn commit(params: CommitParams, ctx: &ToolContext) -> ToolResult {
    match ctx
        .client
        .commit(
            &params.collection,
            params.soft,
            params.wait_searcher,
            params.expunge_deletes,
        )
        .await
    {
        Ok(result) => ToolResult::json(&result),
        Err(e) => e.into(),
    }
}

pub async fn atomic_update(params: AtomicUpdateParams, ctx: &ToolContext) -> ToolResult {
    match ctx
        .client
        .atomic_update(
            &params.collection,
            &params.doc_id,
            &params.updates,
            params.version,
            params.commit,
            params.commit_within,
        )
        .await
    {
        Ok(result) => ToolResult::json(&result),
        Err(e) => e.into(),
    }
}

pub async fn realtime_get(params: RealtimeGetParams, ctx: &ToolContext) -> ToolResult {
    match ctx
        .client
        .realtime_get(&params.collection, &params.doc_ids, params.fl.as_deref())
        .await
    {
        Ok(result) => ToolResult::json(&result),
        Err(e) => e.into(),
    }
}
