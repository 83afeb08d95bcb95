//! Schema field inspection and mutation, with a TTL-bounded field cache.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::{json, Value};

use crate::solr::error::SolrError;

/// A schema field definition sent to the add-field command.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub stored: bool,
    pub indexed: bool,
    pub required: bool,
    #[serde(rename = "multiValued")]
    pub multi_valued: bool,
    #[serde(rename = "docValues", skip_serializing_if = "Option::is_none")]
    pub doc_values: Option<bool>,
}

/// Field lookup and mutation against the Schema API.
///
/// Field listings are memoized per collection with a staleness bound; the
/// cache only exists to avoid repeated schema round trips and is invalidated
/// on every mutation. It is not correctness-critical.
pub struct FieldManager {
    http: reqwest::Client,
    base_url: String,
    ttl: Duration,
    cache: Mutex<HashMap<String, (Instant, Vec<Value>)>>,
}

impl FieldManager {
    pub fn new(http: reqwest::Client, base_url: &str, ttl: Duration) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            ttl,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// List all fields of a collection, served from cache when fresh.
    pub async fn list_fields(&self, collection: &str) -> Result<Vec<Value>, SolrError> {
        if let Some(fields) = self.cached(collection) {
            return Ok(fields);
        }

        let url = format!("{}/{}/schema/fields", self.base_url, collection);
        let raw = self.get_json(&url).await?;
        let fields = raw["fields"].as_array().cloned().ok_or_else(|| {
            SolrError::Schema(format!(
                "Malformed schema response for collection '{collection}'"
            ))
        })?;

        self.store(collection, fields.clone());
        Ok(fields)
    }

    /// Fetch a single field definition.
    pub async fn get_field(&self, collection: &str, name: &str) -> Result<Value, SolrError> {
        let url = format!("{}/{}/schema/fields/{name}", self.base_url, collection);
        let raw = self.get_json(&url).await?;
        raw.get("field").cloned().ok_or_else(|| {
            SolrError::Schema(format!(
                "Field '{name}' not found in collection '{collection}'"
            ))
        })
    }

    /// Add a field via the schema add-field command.
    pub async fn add_field(&self, collection: &str, def: &FieldDefinition) -> Result<(), SolrError> {
        self.mutate(collection, &json!({ "add-field": def })).await
    }

    /// Delete a field via the schema delete-field command.
    pub async fn delete_field(&self, collection: &str, name: &str) -> Result<(), SolrError> {
        self.mutate(collection, &json!({ "delete-field": { "name": name } }))
            .await
    }

    /// Resolve the vector field to search: an explicit name is checked for
    /// existence; otherwise exactly one DenseVectorField-typed field must
    /// exist in the collection.
    pub async fn resolve_vector_field(
        &self,
        collection: &str,
        explicit: Option<&str>,
    ) -> Result<String, SolrError> {
        match explicit {
            Some(name) => {
                let fields = self.list_fields(collection).await?;
                let known = fields
                    .iter()
                    .any(|f| f.get("name").and_then(Value::as_str) == Some(name));
                if !known {
                    return Err(SolrError::Schema(format!(
                        "Field '{name}' does not exist in collection '{collection}'"
                    )));
                }
                Ok(name.to_string())
            }
            None => self.find_vector_field(collection).await,
        }
    }

    /// Auto-detect the single vector field of a collection.
    pub async fn find_vector_field(&self, collection: &str) -> Result<String, SolrError> {
        let url = format!("{}/{}/schema", self.base_url, collection);
        let raw = self.get_json(&url).await?;
        let schema = &raw["schema"];

        let vector_types: Vec<&str> = schema["fieldTypes"]
            .as_array()
            .map(|types| {
                types
                    .iter()
                    .filter(|t| {
                        t.get("class")
                            .and_then(Value::as_str)
                            .is_some_and(|c| c.contains("DenseVectorField"))
                    })
                    .filter_map(|t| t.get("name").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default();

        let candidates: Vec<String> = schema["fields"]
            .as_array()
            .map(|fields| {
                fields
                    .iter()
                    .filter(|f| {
                        f.get("type")
                            .and_then(Value::as_str)
                            .is_some_and(|t| vector_types.contains(&t))
                    })
                    .filter_map(|f| f.get("name").and_then(Value::as_str))
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        match candidates.as_slice() {
            [single] => Ok(single.clone()),
            [] => Err(SolrError::NoVectorField(format!(
                "Collection '{collection}' has no DenseVectorField-typed field"
            ))),
            several => Err(SolrError::NoVectorField(format!(
                "Collection '{collection}' has multiple vector fields ({}); specify one explicitly",
                several.join(", ")
            ))),
        }
    }

    /// Drop any cached field listing for a collection.
    pub fn invalidate(&self, collection: &str) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.remove(collection);
        }
    }

    fn cached(&self, collection: &str) -> Option<Vec<Value>> {
        let cache = self.cache.lock().ok()?;
        let (stored_at, fields) = cache.get(collection)?;
        if stored_at.elapsed() < self.ttl {
            Some(fields.clone())
        } else {
            None
        }
    }

    fn store(&self, collection: &str, fields: Vec<Value>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(collection.to_string(), (Instant::now(), fields));
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value, SolrError> {
        let resp = self.http.get(url).query(&[("wt", "json")]).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SolrError::Schema(format!(
                "Schema request failed with status {}: {body}",
                status.as_u16()
            )));
        }
        resp.json()
            .await
            .map_err(|e| SolrError::Schema(format!("Malformed schema response: {e}")))
    }

    async fn mutate(&self, collection: &str, command: &Value) -> Result<(), SolrError> {
        let url = format!("{}/{}/schema", self.base_url, collection);
        let resp = self.http.post(&url).json(command).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SolrError::Schema(format!(
                "Schema modification failed with status {}: {body}",
                status.as_u16()
            )));
        }
        self.invalidate(collection);
        Ok(())
    }
}
