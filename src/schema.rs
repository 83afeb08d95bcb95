use jsonschema::validator_for;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum SchemaValidationError {
    #[error("Schema compile error: {0}")]
    SchemaCompile(String),
    #[error("{0}")]
    ValidationFailed(String),
}

/// Validate a JSON instance against a JSON Schema (draft 2020-12).
///
/// Used to check `tools/call` arguments against each tool's declared
/// `inputSchema` before they reach a handler.
pub fn validate_instance(schema: &Value, instance: &Value) -> Result<(), SchemaValidationError> {
    let validator = validator_for(schema)
        .map_err(|e| SchemaValidationError::SchemaCompile(e.to_string()))?;

    match validator.validate(instance) {
        Ok(()) => Ok(()),
        Err(e) => Err(SchemaValidationError::ValidationFailed(e.to_string())),
    }
}
