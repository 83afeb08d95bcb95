use std::path::PathBuf;
use std::time::Duration;

/// Default Solr base URL for a local single-node install.
const DEFAULT_SOLR_BASE_URL: &str = "http://localhost:8983/solr";

/// Default HTTP timeout for Solr requests (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default staleness bound for the schema field cache (5 minutes).
const DEFAULT_SCHEMA_CACHE_TTL_SECS: u64 = 300;

/// Default Ollama endpoint for text embeddings.
const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Default embedding model.
const DEFAULT_OLLAMA_MODEL: &str = "nomic-embed-text";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SolrConfig {
    pub solr_base_url: String,
    pub timeout: Duration,
    pub schema_cache_ttl: Duration,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub workspace_root: PathBuf,
}

impl SolrConfig {
    /// Load configuration from environment.
    ///
    /// - `SOLR_BASE_URL` (default `http://localhost:8983/solr`)
    /// - `SOLR_TIMEOUT_SECS` (default 30) — HTTP client timeout
    /// - `SOLR_SCHEMA_CACHE_TTL_SECS` (default 300)
    /// - `OLLAMA_BASE_URL` (default `http://localhost:11434`)
    /// - `OLLAMA_MODEL` (default `nomic-embed-text`)
    /// - `SOLR_WORKSPACE_ROOT` (default `.`) — root scanned by the local
    ///   fallback of the fast search/find tools
    pub fn from_env() -> Result<Self, String> {
        let solr_base_url = env_or("SOLR_BASE_URL", DEFAULT_SOLR_BASE_URL);

        let timeout_secs = env_u64("SOLR_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let ttl_secs = env_u64("SOLR_SCHEMA_CACHE_TTL_SECS", DEFAULT_SCHEMA_CACHE_TTL_SECS)?;

        Ok(Self {
            solr_base_url: solr_base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
            schema_cache_ttl: Duration::from_secs(ttl_secs),
            ollama_base_url: env_or("OLLAMA_BASE_URL", DEFAULT_OLLAMA_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            ollama_model: env_or("OLLAMA_MODEL", DEFAULT_OLLAMA_MODEL),
            workspace_root: std::env::var("SOLR_WORKSPACE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u64(name: &str, default: u64) -> Result<u64, String> {
    match std::env::var(name) {
        Ok(val) => val
            .parse::<u64>()
            .map_err(|_| format!("{name} must be a positive integer")),
        Err(_) => Ok(default),
    }
}
