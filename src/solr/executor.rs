//! Execution of SQL statements against Solr's `/sql` endpoint.

use serde_json::Value;

use crate::solr::error::SolrError;
use crate::solr::response;

/// Executes SQL statements over HTTP.
///
/// Solr reports SQL failures two ways: a non-2xx status, or a 200 whose
/// result set contains a single `EXCEPTION` document. Both are mapped into
/// the typed error taxonomy here so callers never have to inspect raw
/// payloads.
pub struct SqlExecutor {
    http: reqwest::Client,
    base_url: String,
}

impl SqlExecutor {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// POST the statement to `{collection}/sql?aggregationMode=facet` and
    /// return the reshaped result set.
    pub async fn execute_select(&self, collection: &str, stmt: &str) -> Result<Value, SolrError> {
        let url = format!("{}/{}/sql", self.base_url, collection);
        let stmt = stmt.trim();

        tracing::debug!(collection, stmt, "executing SQL statement");

        let resp = self
            .http
            .post(&url)
            .query(&[("aggregationMode", "facet")])
            .form(&[("stmt", stmt)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SolrError::SqlExecution {
                message: format!("SQL query failed with status {}: {body}", status.as_u16()),
                response_time: None,
            });
        }

        let raw: Value = resp.json().await.map_err(|e| SolrError::SqlExecution {
            message: format!("SQL query failed: invalid JSON response: {e}"),
            response_time: None,
        })?;

        check_result_exception(&raw)?;
        Ok(response::format_sql_response(&raw))
    }
}

/// Map an in-band `EXCEPTION` document to the matching typed error.
fn check_result_exception(raw: &Value) -> Result<(), SolrError> {
    let docs = raw["result-set"]["docs"].as_array();
    let Some(docs) = docs else { return Ok(()) };

    for doc in docs {
        let Some(message) = doc.get("EXCEPTION").and_then(Value::as_str) else {
            continue;
        };
        let response_time = doc.get("RESPONSE_TIME").and_then(Value::as_u64);

        if message.contains("must have DocValues") {
            return Err(SolrError::DocValues {
                message: message.to_string(),
                response_time,
            });
        }
        if message.contains("parse failed") {
            return Err(SolrError::SqlParse {
                message: message.to_string(),
                response_time,
            });
        }
        return Err(SolrError::SqlExecution {
            message: message.to_string(),
            response_time,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exception_docs_map_to_typed_errors() {
        let raw = json!({"result-set": {"docs": [
            {"EXCEPTION": "Field 'title' must have DocValues to use this feature", "RESPONSE_TIME": 42}
        ]}});
        match check_result_exception(&raw).unwrap_err() {
            SolrError::DocValues { response_time, .. } => assert_eq!(response_time, Some(42)),
            other => panic!("expected DocValues, got {other:?}"),
        }

        let raw = json!({"result-set": {"docs": [
            {"EXCEPTION": "parse failed: Syntax error near SELECT", "RESPONSE_TIME": 10}
        ]}});
        assert!(matches!(
            check_result_exception(&raw).unwrap_err(),
            SolrError::SqlParse { response_time: Some(10), .. }
        ));

        let raw = json!({"result-set": {"docs": [{"EXCEPTION": "Unknown error occurred"}]}});
        assert!(matches!(
            check_result_exception(&raw).unwrap_err(),
            SolrError::SqlExecution { response_time: None, .. }
        ));
    }

    #[test]
    fn clean_result_set_passes_through() {
        let raw = json!({"result-set": {"docs": [{"id": "1"}, {"EOF": true, "RESPONSE_TIME": 3}]}});
        assert!(check_result_exception(&raw).is_ok());
    }
}
