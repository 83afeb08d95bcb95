//! Text-to-embedding provider backed by the Ollama embeddings API.

use serde::Deserialize;
use serde_json::json;

use crate::solr::error::SolrError;

/// Embedding dimensions for the models shipped by default.
const KNOWN_DIMENSIONS: &[(&str, u64)] = &[("nomic-embed-text", 768), ("all-minilm", 384)];

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f64>,
}

/// Turns search text into a query vector via Ollama.
pub struct OllamaVectorProvider {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaVectorProvider {
    pub fn new(http: reqwest::Client, base_url: &str, model: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Embedding dimension of the configured model, when known.
    pub fn dimension(&self) -> Option<u64> {
        KNOWN_DIMENSIONS
            .iter()
            .find(|(name, _)| *name == self.model)
            .map(|(_, dim)| *dim)
    }

    /// Embed `text`, optionally overriding the configured model for this
    /// single call.
    pub async fn get_vector(
        &self,
        text: &str,
        model_override: Option<&str>,
    ) -> Result<Vec<f64>, SolrError> {
        let model = model_override.unwrap_or(&self.model);
        let url = format!("{}/api/embeddings", self.base_url);

        tracing::debug!(model, "requesting embedding");

        let resp = self
            .http
            .post(&url)
            .json(&json!({ "model": model, "prompt": text }))
            .send()
            .await
            .map_err(|e| SolrError::Connection(format!("Error getting vector: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SolrError::Other(format!(
                "Error getting vector: embedding request failed with status {}: {body}",
                status.as_u16()
            )));
        }

        let parsed: EmbeddingResponse = resp
            .json()
            .await
            .map_err(|e| SolrError::Other(format!("Error getting vector: {e}")))?;

        if parsed.embedding.is_empty() {
            return Err(SolrError::Other(
                "Error getting vector: provider returned an empty embedding".into(),
            ));
        }

        Ok(parsed.embedding)
    }
}
