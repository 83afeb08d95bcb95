use serde::{Deserialize, Serialize};

/// Typed errors for every Solr-facing operation.
///
/// Specific variants raised by inner layers are re-raised unchanged by the
/// outer layers; only unexpected failures get wrapped into the
/// nearest-fitting variant with the original message kept as context.
/// No operation retries.
#[derive(Debug, thiserror::Error)]
pub enum SolrError {
    /// Transport-level failure reaching Solr.
    #[error("Failed to connect to Solr: {0}")]
    Connection(String),

    /// The SQL statement could not be decomposed or was rejected by the
    /// parser on the Solr side.
    #[error("SQL parse error: {message}")]
    SqlParse {
        message: String,
        response_time: Option<u64>,
    },

    /// The SQL endpoint rejected or failed to execute the statement.
    #[error("SQL execution error: {message}")]
    SqlExecution {
        message: String,
        response_time: Option<u64>,
    },

    /// The SQL endpoint reported a field without DocValues for an access
    /// pattern that requires them.
    #[error("Missing DocValues: {message}")]
    DocValues {
        message: String,
        response_time: Option<u64>,
    },

    /// Field or collection lookup, validation, or mutation failure.
    #[error("Schema error: {0}")]
    Schema(String),

    /// No vector field supplied and auto-detection found none (or more than
    /// one) DenseVectorField-typed candidate.
    #[error("No vector field available: {0}")]
    NoVectorField(String),

    /// Document add/delete/update precondition violated or mutation
    /// rejected, including optimistic-concurrency version conflicts.
    #[error("Indexing error: {0}")]
    Indexing(String),

    /// Standard-query or vector-query failure not covered above.
    #[error("Query error: {0}")]
    Query(String),

    /// Catch-all for failures outside the other categories.
    #[error("Solr error: {0}")]
    Other(String),
}

impl SolrError {
    /// Stable snake_case code reported in structured tool-error payloads.
    pub fn code(&self) -> SolrErrorCode {
        match self {
            Self::Connection(_) => SolrErrorCode::ConnectionError,
            Self::SqlParse { .. } => SolrErrorCode::SqlParseError,
            Self::SqlExecution { .. } => SolrErrorCode::SqlExecutionError,
            Self::DocValues { .. } => SolrErrorCode::DocvaluesError,
            Self::Schema(_) => SolrErrorCode::SchemaError,
            Self::NoVectorField(_) => SolrErrorCode::NoVectorField,
            Self::Indexing(_) => SolrErrorCode::IndexingError,
            Self::Query(_) => SolrErrorCode::QueryError,
            Self::Other(_) => SolrErrorCode::SolrError,
        }
    }
}

impl From<reqwest::Error> for SolrError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::Connection(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

/// Error code carried in the `error.code` field of tool-error payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolrErrorCode {
    ConnectionError,
    SqlParseError,
    SqlExecutionError,
    DocvaluesError,
    SchemaError,
    NoVectorField,
    IndexingError,
    QueryError,
    SolrError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_serialize_snake_case() {
        let json = serde_json::to_string(&SolrErrorCode::SqlParseError).unwrap();
        assert_eq!(json, r#""sql_parse_error""#);
        let json = serde_json::to_string(&SolrErrorCode::DocvaluesError).unwrap();
        assert_eq!(json, r#""docvalues_error""#);
    }

    #[test]
    fn display_keeps_original_message() {
        let err = SolrError::Indexing("Cannot specify both 'ids' and 'query'".into());
        assert_eq!(
            err.to_string(),
            "Indexing error: Cannot specify both 'ids' and 'query'"
        );
    }
}
