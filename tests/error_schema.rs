use jsonschema::validator_for;
use serde_json::Value;

use solr_mcp_server::protocol::{json_rpc_code, SolrErrorResponse};
use solr_mcp_server::solr::SolrErrorCode;

#[test]
fn golden_error_schema_validation() {
    // 1. Build a canonical error response
    let response = SolrErrorResponse::new(
        SolrErrorCode::DocvaluesError,
        "Field 'title' must have DocValues to use this feature",
    );

    let json_str = serde_json::to_string_pretty(&response).unwrap();
    let json_value: Value = serde_json::from_str(&json_str).unwrap();

    // 2. Schema — frozen
    let schema_str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "Solr Tool Error Response",
  "type": "object",
  "required": ["error"],
  "additionalProperties": false,
  "properties": {
    "error": {
      "type": "object",
      "required": ["code", "message"],
      "additionalProperties": false,
      "properties": {
        "code": {
          "type": "string",
          "enum": [
            "connection_error",
            "sql_parse_error",
            "sql_execution_error",
            "docvalues_error",
            "schema_error",
            "no_vector_field",
            "indexing_error",
            "query_error",
            "solr_error"
          ]
        },
        "message": {
          "type": "string",
          "minLength": 1
        }
      }
    }
  }
}"#;

    let schema_json: Value = serde_json::from_str(schema_str).unwrap();
    let validator = validator_for(&schema_json).unwrap();

    // 3. Validate against schema
    assert!(validator.is_valid(&json_value), "error JSON must satisfy the schema");

    // 4. Golden snapshot (byte-identical, stable)
    let expected = r#"{
  "error": {
    "code": "docvalues_error",
    "message": "Field 'title' must have DocValues to use this feature"
  }
}"#;

    assert_eq!(json_str.trim(), expected.trim(), "error JSON snapshot mismatch");
}

#[test]
fn every_code_satisfies_the_frozen_schema() {
    let schema_json: Value = serde_json::json!({
        "type": "object",
        "required": ["error"],
        "properties": {
            "error": {
                "type": "object",
                "required": ["code", "message"],
                "properties": {
                    "code": { "type": "string" },
                    "message": { "type": "string", "minLength": 1 }
                }
            }
        }
    });
    let validator = validator_for(&schema_json).unwrap();

    for code in [
        SolrErrorCode::ConnectionError,
        SolrErrorCode::SqlParseError,
        SolrErrorCode::SqlExecutionError,
        SolrErrorCode::DocvaluesError,
        SolrErrorCode::SchemaError,
        SolrErrorCode::NoVectorField,
        SolrErrorCode::IndexingError,
        SolrErrorCode::QueryError,
        SolrErrorCode::SolrError,
    ] {
        let response = SolrErrorResponse::new(code, "boom");
        let value = serde_json::to_value(&response).unwrap();
        assert!(validator.is_valid(&value), "code {code:?} failed schema validation");
    }
}

#[test]
fn json_rpc_mapping_separates_input_from_server_failures() {
    // Caller mistakes
    assert_eq!(json_rpc_code(SolrErrorCode::SqlParseError), -32602);
    assert_eq!(json_rpc_code(SolrErrorCode::NoVectorField), -32602);
    assert_eq!(json_rpc_code(SolrErrorCode::IndexingError), -32602);

    // Server-side failures
    assert_eq!(json_rpc_code(SolrErrorCode::ConnectionError), -32603);
    assert_eq!(json_rpc_code(SolrErrorCode::SqlExecutionError), -32603);
    assert_eq!(json_rpc_code(SolrErrorCode::DocvaluesError), -32603);
    assert_eq!(json_rpc_code(SolrErrorCode::SolrError), -32603);
}
