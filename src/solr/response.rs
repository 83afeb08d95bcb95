//! Reshaping of raw Solr JSON into the compact forms returned to agents.

use serde_json::{json, Value};

/// Reshape a raw `/sql` response: drop the `EOF` marker document and attach
/// a `numFound` count alongside the surviving docs.
pub fn format_sql_response(raw: &Value) -> Value {
    let docs: Vec<Value> = raw["result-set"]["docs"]
        .as_array()
        .map(|docs| {
            docs.iter()
                .filter(|d| d.get("EOF").is_none())
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    json!({
        "result-set": {
            "numFound": docs.len(),
            "docs": docs,
        }
    })
}

/// Reshape a raw `/select` response, carrying highlighting and stats
/// sections through only when the server produced them.
pub fn format_select_response(
    raw: &Value,
    collection: &str,
    q: &str,
    rows: u64,
    start: u64,
) -> Value {
    let mut formatted = json!({
        "num_found": raw["response"]["numFound"].as_u64().unwrap_or(0),
        "docs": raw["response"]["docs"].as_array().cloned().unwrap_or_default(),
        "start": raw["response"].get("start").and_then(Value::as_u64).unwrap_or(start),
        "query_info": {
            "q": q,
            "rows": rows,
            "collection": collection,
        }
    });

    if let Some(hl) = raw.get("highlighting") {
        formatted["highlighting"] = hl.clone();
    }
    if let Some(stats_fields) = raw.get("stats").and_then(|s| s.get("stats_fields")) {
        formatted["stats"] = stats_fields.clone();
    }

    formatted
}

/// Flatten Solr's `[term1, count1, term2, count2, ...]` pair array into a
/// list of `{term, frequency}` objects.
pub fn format_terms_response(raw: &Value, collection: &str, field: &str) -> Value {
    let pairs = raw["terms"][field].as_array().cloned().unwrap_or_default();

    let mut terms = Vec::with_capacity(pairs.len() / 2);
    for chunk in pairs.chunks(2) {
        if let [term, frequency] = chunk {
            terms.push(json!({"term": term, "frequency": frequency}));
        }
    }

    json!({
        "terms": terms,
        "field": field,
        "collection": collection,
        "total_terms": terms.len(),
    })
}

/// Extract the document list from a real-time get response, which uses a
/// `doc` key for single-ID lookups and a `response.docs` array otherwise.
pub fn extract_realtime_docs(raw: &Value) -> Vec<Value> {
    if let Some(doc) = raw.get("doc") {
        return if doc.is_null() { vec![] } else { vec![doc.clone()] };
    }
    raw["response"]["docs"].as_array().cloned().unwrap_or_default()
}
