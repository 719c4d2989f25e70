//! Schema input parsing and schema-level option resolution.
//!
//! Accepted input shapes (JSON):
//! - Bundle: `{ "schemas": [ { "name": ..., "fields": { ... } }, ... ] }`
//! - List: `[ { "name": ..., "fields": { ... } }, ... ]`
//! - Single schema: `{ "name": ..., "timestamps": ..., "fields": { ... } }`
//!
//! Field order inside `fields` is preserved and drives emission order.

use serde_json::Value as JsonValue;

use crate::ast::{ModelSchema, SchemaBundle, TimestampConfig, TimestampKey, TimestampPolicy};
use crate::error::CodegenError;

pub const DEFAULT_CREATED_AT: &str = "createdAt";
pub const DEFAULT_UPDATED_AT: &str = "updatedAt";

/// Parses schema input text into a [`SchemaBundle`].
pub fn parse_schema_bundle(input: &str) -> Result<SchemaBundle, CodegenError> {
    let value: JsonValue = serde_json::from_str(input)
        .map_err(|e| CodegenError::SchemaError(format!("invalid schema JSON: {e}")))?;

    let bundle = match &value {
        JsonValue::Array(_) => SchemaBundle {
            schemas: serde_json::from_str(input).map_err(schema_shape_error)?,
        },
        JsonValue::Object(map) if map.contains_key("schemas") => {
            serde_json::from_str(input).map_err(schema_shape_error)?
        }
        JsonValue::Object(_) => SchemaBundle {
            schemas: vec![serde_json::from_str::<ModelSchema>(input).map_err(schema_shape_error)?],
        },
        _ => {
            return Err(CodegenError::SchemaError(
                "schema input must be an object or a list of schemas".to_string(),
            ))
        }
    };

    validate_bundle(&bundle)?;
    Ok(bundle)
}

fn schema_shape_error(err: serde_json::Error) -> CodegenError {
    CodegenError::SchemaError(format!("invalid schema description: {err}"))
}

fn validate_bundle(bundle: &SchemaBundle) -> Result<(), CodegenError> {
    for (index, schema) in bundle.schemas.iter().enumerate() {
        if schema.name.trim().is_empty() {
            return Err(CodegenError::SchemaError(format!(
                "schemas[{index}] must have a non-empty name"
            )));
        }
        for field in &schema.fields {
            if field.key.is_empty() {
                return Err(CodegenError::SchemaError(format!(
                    "schema '{}' has a field with an empty key",
                    schema.name
                )));
            }
        }
    }
    Ok(())
}

/// Resolves the `timestamps` schema option into concrete property names.
///
/// `true` enables both defaults. In the per-key form a missing key or `true`
/// keeps the default name, a string renames it and `false` disables it.
pub fn resolve_timestamp_policy(config: Option<&TimestampConfig>) -> TimestampPolicy {
    match config {
        None | Some(TimestampConfig::Enabled(false)) => TimestampPolicy::default(),
        Some(TimestampConfig::Enabled(true)) => TimestampPolicy {
            created_at_field: Some(DEFAULT_CREATED_AT.to_string()),
            updated_at_field: Some(DEFAULT_UPDATED_AT.to_string()),
        },
        Some(TimestampConfig::PerKey(keys)) => TimestampPolicy {
            created_at_field: resolve_key(keys.created_at.as_ref(), DEFAULT_CREATED_AT),
            updated_at_field: resolve_key(keys.updated_at.as_ref(), DEFAULT_UPDATED_AT),
        },
    }
}

fn resolve_key(key: Option<&TimestampKey>, default: &str) -> Option<String> {
    match key {
        None | Some(TimestampKey::Enabled(true)) => Some(default.to_string()),
        Some(TimestampKey::Enabled(false)) => None,
        Some(TimestampKey::Named(name)) => Some(name.clone()),
    }
}
