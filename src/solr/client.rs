//! Client facade over Solr's REST, Schema, and SQL APIs.
//!
//! Every public method is a single logical operation: build parameters,
//! issue one HTTP round trip (two for the vector-filtered path), translate
//! failures into the typed taxonomy, and reshape the JSON for the caller.
//! Typed errors raised by inner layers propagate unchanged.

use serde_json::{json, Map, Value};

use crate::config::SolrConfig;
use crate::solr::error::SolrError;
use crate::solr::executor::SqlExecutor;
use crate::solr::response;
use crate::solr::schema::{FieldDefinition, FieldManager};
use crate::solr::sql;
use crate::solr::vector::VectorManager;
use crate::vector_provider::OllamaVectorProvider;

/// Options for a standard `/select` query with highlighting and stats.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub q: String,
    pub fq: Vec<String>,
    pub fl: Option<String>,
    pub rows: u64,
    pub start: u64,
    pub sort: Option<String>,
    pub highlight_fields: Vec<String>,
    pub highlight_snippets: u64,
    pub highlight_fragsize: u64,
    pub highlight_method: String,
    pub stats_fields: Vec<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            q: "*:*".to_string(),
            fq: Vec::new(),
            fl: None,
            rows: 10,
            start: 0,
            sort: None,
            highlight_fields: Vec::new(),
            highlight_snippets: 3,
            highlight_fragsize: 100,
            highlight_method: "unified".to_string(),
            stats_fields: Vec::new(),
        }
    }
}

/// Client for a Solr cluster.
pub struct SolrClient {
    base_url: String,
    http: reqwest::Client,
    field_manager: FieldManager,
    executor: SqlExecutor,
    vector_manager: VectorManager,
    vector_provider: OllamaVectorProvider,
}

impl SolrClient {
    pub fn new(config: &SolrConfig) -> Result<Self, SolrError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SolrError::Other(format!("Failed to build HTTP client: {e}")))?;

        let base_url = config.solr_base_url.trim_end_matches('/').to_string();

        Ok(Self {
            field_manager: FieldManager::new(http.clone(), &base_url, config.schema_cache_ttl),
            executor: SqlExecutor::new(http.clone(), &base_url),
            vector_manager: VectorManager::new(http.clone(), &base_url),
            vector_provider: OllamaVectorProvider::new(
                http.clone(),
                &config.ollama_base_url,
                &config.ollama_model,
            ),
            base_url,
            http,
        })
    }

    pub fn vector_provider(&self) -> &OllamaVectorProvider {
        &self.vector_provider
    }

    /// List all collections in the cluster.
    pub async fn list_collections(&self) -> Result<Vec<String>, SolrError> {
        let url = format!("{}/admin/collections", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("action", "LIST"), ("wt", "json")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SolrError::Other(format!(
                "Failed to list collections: status {}: {body}",
                status.as_u16()
            )));
        }

        let raw: Value = resp
            .json()
            .await
            .map_err(|e| SolrError::Other(format!("Failed to list collections: {e}")))?;

        Ok(raw["collections"]
            .as_array()
            .map(|c| {
                c.iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default())
    }

    /// List all fields of a collection with their properties.
    pub async fn list_fields(&self, collection: &str) -> Result<Vec<Value>, SolrError> {
        self.field_manager.list_fields(collection).await
    }

    /// Execute a SQL SELECT statement through the SQL endpoint.
    pub async fn execute_select_query(&self, query: &str) -> Result<Value, SolrError> {
        let parsed = sql::parse_select(query)?;
        self.executor.execute_select(&parsed.collection, query).await
    }

    /// Execute a SQL SELECT restricted to the nearest neighbors of `vector`.
    ///
    /// The similarity search runs first with `top_k = limit + offset`
    /// candidates; the statement is then rewritten with an `id IN (...)`
    /// predicate (or an always-false one when the search found nothing) and
    /// handed to the SQL endpoint. The final result keeps the SQL engine's
    /// ordering, not similarity rank.
    pub async fn execute_vector_select_query(
        &self,
        query: &str,
        vector: &[f64],
        field: Option<&str>,
    ) -> Result<Value, SolrError> {
        let parsed = sql::parse_select(query)?;
        let field = self
            .field_manager
            .resolve_vector_field(&parsed.collection, field)
            .await?;

        let top_k = parsed.top_k();
        let candidates = self
            .vector_manager
            .execute_vector_search(&parsed.collection, vector, &field, top_k, None)
            .await?;

        let doc_ids = candidates.doc_ids();
        tracing::debug!(
            collection = parsed.collection,
            candidates = doc_ids.len(),
            top_k,
            "vector search complete, rewriting statement"
        );

        let stmt = sql::compose_filtered(query, &doc_ids)?;
        self.executor.execute_select(&parsed.collection, &stmt).await
    }

    /// Execute a SQL SELECT restricted by semantic similarity to `text`.
    pub async fn execute_semantic_select_query(
        &self,
        query: &str,
        text: &str,
        field: Option<&str>,
        model: Option<&str>,
    ) -> Result<Value, SolrError> {
        let vector = self.vector_provider.get_vector(text, model).await?;
        self.execute_vector_select_query(query, &vector, field).await
    }

    /// Add or update a batch of documents.
    pub async fn add_documents(
        &self,
        collection: &str,
        documents: &[Value],
        commit: bool,
        commit_within: Option<u64>,
        overwrite: bool,
    ) -> Result<Value, SolrError> {
        if documents.is_empty() {
            return Err(SolrError::Indexing("No documents provided".into()));
        }
        self.ensure_collection_exists(collection).await?;

        let url = format!("{}/{}/update", self.base_url, collection);
        let mut params = vec![("wt", "json".to_string())];
        if commit {
            params.push(("commit", "true".to_string()));
        } else if let Some(ms) = commit_within {
            params.push(("commitWithin", ms.to_string()));
        }
        if !overwrite {
            params.push(("overwrite", "false".to_string()));
        }

        let resp = self
            .http
            .post(&url)
            .query(&params)
            .json(documents)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SolrError::Indexing(format!(
                "Failed to add documents: status {}: {body}",
                status.as_u16()
            )));
        }

        Ok(json!({
            "status": "success",
            "collection": collection,
            "num_documents": documents.len(),
            "committed": commit,
            "commit_within": commit_within,
        }))
    }

    /// Delete documents by ID list or by query (mutually exclusive).
    pub async fn delete_documents(
        &self,
        collection: &str,
        ids: Option<&[String]>,
        query: Option<&str>,
        commit: bool,
    ) -> Result<Value, SolrError> {
        let ids = ids.filter(|ids| !ids.is_empty());
        match (ids, query) {
            (Some(_), Some(_)) => {
                return Err(SolrError::Indexing(
                    "Cannot specify both 'ids' and 'query'".into(),
                ))
            }
            (None, None) => {
                return Err(SolrError::Indexing(
                    "Must specify either 'ids' or 'query'".into(),
                ))
            }
            _ => {}
        }
        self.ensure_collection_exists(collection).await?;

        let body = match ids {
            Some(ids) => json!({ "delete": ids }),
            None => json!({ "delete": { "query": query } }),
        };

        let url = format!("{}/{}/update", self.base_url, collection);
        let mut params = vec![("wt", "json")];
        if commit {
            params.push(("commit", "true"));
        }

        let resp = self
            .http
            .post(&url)
            .query(&params)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(SolrError::Indexing(format!(
                "Failed to delete documents: status {}: {text}",
                status.as_u16()
            )));
        }

        let num_affected = match ids {
            Some(ids) => json!(ids.len()),
            None => json!("unknown (query-based)"),
        };

        Ok(json!({
            "status": "success",
            "collection": collection,
            "num_affected": num_affected,
            "committed": commit,
            "delete_by": if ids.is_some() { "id" } else { "query" },
        }))
    }

    /// Commit pending changes, soft (visible) or hard (durable).
    pub async fn commit(
        &self,
        collection: &str,
        soft: bool,
        wait_searcher: bool,
        expunge_deletes: bool,
    ) -> Result<Value, SolrError> {
        self.ensure_collection_exists(collection).await?;

        let url = format!("{}/{}/update", self.base_url, collection);
        let mut params = vec![("wt", "json")];
        if soft {
            params.push(("softCommit", "true"));
        } else {
            params.push(("commit", "true"));
            params.push(("waitSearcher", bool_str(wait_searcher)));
            params.push(("expungeDeletes", bool_str(expunge_deletes)));
        }

        let resp = self.http.post(&url).query(&params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SolrError::Other(format!(
                "Commit failed with status {}: {body}",
                status.as_u16()
            )));
        }

        Ok(json!({
            "status": "success",
            "collection": collection,
            "commit_type": if soft { "soft" } else { "hard" },
            "committed": true,
        }))
    }

    /// Execute a standard query with optional highlighting and stats.
    pub async fn execute_query(
        &self,
        collection: &str,
        options: &SearchOptions,
    ) -> Result<Value, SolrError> {
        let url = format!("{}/{}/select", self.base_url, collection);

        let mut params: Vec<(&str, String)> = vec![
            ("q", options.q.clone()),
            ("rows", options.rows.to_string()),
            ("start", options.start.to_string()),
            ("wt", "json".to_string()),
        ];
        for fq in &options.fq {
            params.push(("fq", fq.clone()));
        }
        if let Some(fl) = &options.fl {
            params.push(("fl", fl.clone()));
        }
        if let Some(sort) = &options.sort {
            params.push(("sort", sort.clone()));
        }
        if !options.highlight_fields.is_empty() {
            params.push(("hl", "true".to_string()));
            params.push(("hl.fl", options.highlight_fields.join(",")));
            params.push(("hl.snippets", options.highlight_snippets.to_string()));
            params.push(("hl.fragsize", options.highlight_fragsize.to_string()));
            params.push(("hl.method", options.highlight_method.clone()));
        }
        if !options.stats_fields.is_empty() {
            params.push(("stats", "true".to_string()));
            for field in &options.stats_fields {
                params.push(("stats.field", field.clone()));
            }
        }

        let resp = self.http.get(&url).query(&params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SolrError::Query(format!(
                "Query failed with status {}: {body}",
                status.as_u16()
            )));
        }

        let raw: Value = resp
            .json()
            .await
            .map_err(|e| SolrError::Query(format!("Query execution failed: {e}")))?;

        Ok(response::format_select_response(
            &raw,
            collection,
            &options.q,
            options.rows,
            options.start,
        ))
    }

    /// Enumerate indexed terms of a field via the Terms Component.
    #[allow(clippy::too_many_arguments)]
    pub async fn get_terms(
        &self,
        collection: &str,
        field: &str,
        prefix: Option<&str>,
        regex: Option<&str>,
        limit: u64,
        min_count: u64,
        max_count: Option<u64>,
    ) -> Result<Value, SolrError> {
        let url = format!("{}/{}/terms", self.base_url, collection);

        let mut params: Vec<(&str, String)> = vec![
            ("terms.fl", field.to_string()),
            ("terms.limit", limit.to_string()),
            ("terms.mincount", min_count.to_string()),
            ("wt", "json".to_string()),
        ];
        if let Some(prefix) = prefix {
            params.push(("terms.prefix", prefix.to_string()));
        }
        if let Some(regex) = regex {
            params.push(("terms.regex", regex.to_string()));
        }
        if let Some(max) = max_count {
            params.push(("terms.maxcount", max.to_string()));
        }

        let resp = self.http.get(&url).query(&params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SolrError::Other(format!(
                "Terms request failed with status {}: {body}",
                status.as_u16()
            )));
        }

        let raw: Value = resp
            .json()
            .await
            .map_err(|e| SolrError::Other(format!("Failed to get terms: {e}")))?;

        Ok(response::format_terms_response(&raw, collection, field))
    }

    /// Add a field to a collection's schema.
    pub async fn add_schema_field(
        &self,
        collection: &str,
        def: &FieldDefinition,
    ) -> Result<Value, SolrError> {
        self.field_manager.add_field(collection, def).await?;
        Ok(json!({
            "status": "success",
            "field": def,
            "collection": collection,
        }))
    }

    /// List all schema fields of a collection.
    pub async fn get_schema_fields(&self, collection: &str) -> Result<Value, SolrError> {
        let fields = self.field_manager.list_fields(collection).await?;
        Ok(json!({
            "total_fields": fields.len(),
            "fields": fields,
            "collection": collection,
        }))
    }

    /// Fetch a single schema field definition.
    pub async fn get_schema_field(
        &self,
        collection: &str,
        field_name: &str,
    ) -> Result<Value, SolrError> {
        let field = self.field_manager.get_field(collection, field_name).await?;
        Ok(json!({
            "field": field,
            "collection": collection,
        }))
    }

    /// Delete a field from a collection's schema.
    pub async fn delete_schema_field(
        &self,
        collection: &str,
        field_name: &str,
    ) -> Result<Value, SolrError> {
        self.field_manager.delete_field(collection, field_name).await?;
        Ok(json!({
            "status": "success",
            "field_name": field_name,
            "collection": collection,
        }))
    }

    /// Atomically update fields of one document.
    ///
    /// `updates` maps field names to operation objects, e.g.
    /// `{"price": {"set": 29.99}, "stock": {"inc": -5}}`. Supported
    /// operations: set, add, remove, removeregex, inc, set-if-null. With
    /// `version`, the update fails on a concurrent modification.
    pub async fn atomic_update(
        &self,
        collection: &str,
        doc_id: &str,
        updates: &Map<String, Value>,
        version: Option<i64>,
        commit: bool,
        commit_within: Option<u64>,
    ) -> Result<Value, SolrError> {
        if updates.is_empty() {
            return Err(SolrError::Indexing("No field updates provided".into()));
        }
        self.ensure_collection_exists(collection).await?;

        let mut doc = Map::new();
        doc.insert("id".to_string(), json!(doc_id));
        if let Some(version) = version {
            doc.insert("_version_".to_string(), json!(version));
        }
        for (field, operation) in updates {
            doc.insert(field.clone(), operation.clone());
        }

        let url = format!("{}/{}/update", self.base_url, collection);
        let mut params = vec![("wt", "json".to_string())];
        if commit {
            params.push(("commit", "true".to_string()));
        } else if let Some(ms) = commit_within {
            params.push(("commitWithin", ms.to_string()));
        }

        let resp = self
            .http
            .post(&url)
            .query(&params)
            .json(&json!([doc]))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            if body.to_lowercase().contains("version conflict") {
                return Err(SolrError::Indexing(format!(
                    "Version conflict: document '{doc_id}' has been modified (expected version {version:?})"
                )));
            }
            return Err(SolrError::Other(format!(
                "Atomic update failed with status {}: {body}",
                status.as_u16()
            )));
        }

        Ok(json!({
            "status": "success",
            "doc_id": doc_id,
            "collection": collection,
            "updates_applied": updates.len(),
        }))
    }

    /// Fetch documents in real time, including uncommitted changes.
    pub async fn realtime_get(
        &self,
        collection: &str,
        doc_ids: &[String],
        fl: Option<&str>,
    ) -> Result<Value, SolrError> {
        if doc_ids.is_empty() {
            return Err(SolrError::Query("No document IDs provided".into()));
        }
        self.ensure_collection_exists(collection).await?;

        let url = format!("{}/{}/get", self.base_url, collection);
        let mut params: Vec<(&str, String)> = vec![("wt", "json".to_string())];
        if doc_ids.len() == 1 {
            params.push(("id", doc_ids[0].clone()));
        } else {
            params.push(("ids", doc_ids.join(",")));
        }
        if let Some(fl) = fl {
            params.push(("fl", fl.to_string()));
        }

        let resp = self.http.get(&url).query(&params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SolrError::Other(format!(
                "Real-time get failed with status {}: {body}",
                status.as_u16()
            )));
        }

        let raw: Value = resp
            .json()
            .await
            .map_err(|e| SolrError::Other(format!("Failed to get documents: {e}")))?;

        let docs = response::extract_realtime_docs(&raw);
        Ok(json!({
            "num_found": docs.len(),
            "docs": docs,
            "collection": collection,
        }))
    }

    async fn ensure_collection_exists(&self, collection: &str) -> Result<(), SolrError> {
        let collections = self.list_collections().await?;
        if !collections.iter().any(|c| c == collection) {
            return Err(SolrError::Other(format!(
                "Collection '{collection}' does not exist"
            )));
        }
        Ok(())
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
