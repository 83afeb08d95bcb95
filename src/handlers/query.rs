//! Standard `/select` queries and the Terms Component.

use serde_json::{json, Value};

use crate::protocol::{QueryParams, TermsParams, ToolResult};
use crate::solr::SearchOptions;

use super::ToolContext;

pub fn tools() -> Vec<Value> {
    vec![
        json!({
            "name": "solr_query",
            "description": "Run a standard Solr query with optional filters, sorting, highlighting, and field statistics",
            "inputSchema": {
                "type": "object",
                "required": ["collection"],
                "properties": {
                    "collection": { "type": "string" },
                    "q": {
                        "type": "string",
                        "description": "Main query in Lucene syntax. Defaults to *:*"
                    },
                    "fq": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Filter queries, applied without affecting scoring"
                    },
                    "fl": {
                        "type": "string",
                        "description": "Comma-separated field list to return"
                    },
                    "rows": { "type": "integer", "minimum": 0, "description": "Rows to return (default 10)" },
                    "start": { "type": "integer", "minimum": 0, "description": "Offset for pagination" },
                    "sort": { "type": "string", "description": "Sort spec, e.g. 'price desc'" },
                    "highlight_fields": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Fields to generate highlight snippets for"
                    },
                    "highlight_snippets": { "type": "integer", "minimum": 1 },
                    "highlight_fragsize": { "type": "integer", "minimum": 1 },
                    "highlight_method": {
                        "type": "string",
                        "enum": ["unified", "original", "fastVector"]
                    },
                    "stats_fields": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Numeric fields to compute min/max/mean/etc. statistics for"
                    }
                }
            }
        }),
        json!({
            "name": "solr_terms",
            "description": "Enumerate indexed terms of a field with document frequencies, optionally filtered by prefix or regex",
            "inputSchema": {
                "type": "object",
                "required": ["collection", "field"],
                "properties": {
                    "collection": { "type": "string" },
                    "field": { "type": "string" },
                    "prefix": { "type": "string", "description": "Only terms starting with this prefix" },
                    "regex": { "type": "string", "description": "Only terms matching this regular expression" },
                    "limit": { "type": "integer", "minimum": 1, "description": "Maximum terms to return (default 10)" },
                    "min_count": { "type": "integer", "minimum": 0 },
                    "max_count": { "type": "integer", "minimum": 0 }
                }
            }
        }),
    ]
}

pub async fn standard_query(params: QueryParams, ctx: &ToolContext) -> ToolResult {
    let options = SearchOptions {
        q: params.q,
        fq: params.fq,
        fl: params.fl,
        rows: params.rows,
        start: params.start,
        sort: params.sort,
        highlight_fields: params.highlight_fields,
        highlight_snippets: params.highlight_snippets,
        highlight_fragsize: params.highlight_fragsize,
        highlight_method: params.highlight_method,
        stats_fields: params.stats_fields,
    };
    match ctx.client.execute_query(&params.collection, &options).await {
        Ok(result) => ToolResult::json(&result),
        Err(e) => e.into(),
    }
}

pub async fn terms(params: TermsParams, ctx: &ToolContext) -> ToolResult {
    match ctx
        .client
        .get_terms(
            &params.collection,
            &params.field,
            params.prefix.as_deref(),
            params.regex.as_deref(),
            params.limit,
            params.min_count,
            params.max_count,
        )
        .await
    {
        Ok(result) => ToolResult::json(&result),
        Err(e) => e.into(),
    }
}
