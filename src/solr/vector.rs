//! KNN similarity search against a vector-indexed field.

use serde::Serialize;
use serde_json::Value;

use crate::solr::error::SolrError;

/// Candidates requested when the caller gives no explicit bound.
pub const DEFAULT_TOP_K: u64 = 10;

/// A single similarity-search hit.
#[derive(Debug, Clone, Serialize)]
pub struct VectorSearchResult {
    pub doc_id: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// Ordered candidate set returned by a similarity search, at most `top_k`
/// entries, in rank order.
#[derive(Debug, Clone, Serialize)]
pub struct VectorSearchResults {
    pub results: Vec<VectorSearchResult>,
    pub total_found: u64,
    pub top_k: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_time_ms: Option<u64>,
}

impl VectorSearchResults {
    /// Build from a raw `/select` response to a KNN query.
    pub fn from_solr_response(raw: &Value, top_k: u64) -> Self {
        let query_time_ms = raw["responseHeader"]["QTime"].as_u64();
        let total_found = raw["response"]["numFound"].as_u64().unwrap_or(0);

        let mut results = Vec::new();
        if let Some(docs) = raw["response"]["docs"].as_array() {
            for doc in docs.iter().take(top_k as usize) {
                let doc_id = doc
                    .get("id")
                    .or_else(|| doc.get("_docid_"))
                    .map(value_to_id)
                    .unwrap_or_else(|| "0".to_string());
                results.push(VectorSearchResult {
                    doc_id,
                    score: doc.get("score").and_then(Value::as_f64).unwrap_or(0.0),
                    distance: doc.get("_vector_distance_").and_then(Value::as_f64),
                });
            }
        }

        Self {
            results,
            total_found,
            top_k,
            query_time_ms,
        }
    }

    /// Document IDs in similarity-rank order.
    pub fn doc_ids(&self) -> Vec<String> {
        self.results.iter().map(|r| r.doc_id.clone()).collect()
    }
}

fn value_to_id(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Runs KNN searches through Solr's standard select handler.
pub struct VectorManager {
    http: reqwest::Client,
    base_url: String,
}

impl VectorManager {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Render the `{!knn}` query parser invocation for the given vector.
    pub fn format_knn_query(vector: &[f64], field: &str, top_k: Option<u64>) -> String {
        let joined = vector
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        match top_k {
            Some(k) => format!("{{!knn f={field} topK={k}}}[{joined}]"),
            None => format!("{{!knn f={field}}}[{joined}]"),
        }
    }

    /// Run a KNN search and return the ranked candidate set.
    pub async fn execute_vector_search(
        &self,
        collection: &str,
        vector: &[f64],
        field: &str,
        top_k: u64,
        filter_query: Option<&str>,
    ) -> Result<VectorSearchResults, SolrError> {
        if vector.is_empty() {
            return Err(SolrError::Query("Query vector is empty".into()));
        }

        let url = format!("{}/{}/select", self.base_url, collection);
        let knn = Self::format_knn_query(vector, field, Some(top_k));
        let rows = top_k.to_string();

        let mut params = vec![
            ("q", knn.as_str()),
            ("fl", "id,score,_vector_distance_"),
            ("rows", rows.as_str()),
            ("wt", "json"),
        ];
        if let Some(fq) = filter_query {
            params.push(("fq", fq));
        }

        tracing::debug!(collection, field, top_k, "executing KNN search");

        let resp = self.http.get(&url).query(&params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SolrError::Query(format!(
                "Vector search failed with status {}: {body}",
                status.as_u16()
            )));
        }

        let raw: Value = resp
            .json()
            .await
            .map_err(|e| SolrError::Query(format!("Vector search failed: {e}")))?;

        Ok(VectorSearchResults::from_solr_response(&raw, top_k))
    }
}
