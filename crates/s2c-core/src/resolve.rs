use serde_json::Value;

use crate::document::{DEFINITIONS_PREFIX, Definitions};
use crate::error::ResolveError;

/// Property names of the definition a body schema points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSchema {
    pub fields: Vec<String>,
    /// The schema was `{type: array, items: {$ref}}`.
    pub is_array: bool,
}

/// Resolve a body parameter schema against the definitions table.
///
/// A schema without a `type` key is a direct `$ref`; any schema with a `type` is
/// treated as an array wrapper whose `items.$ref` names the definition. Only one
/// level of reference is followed.
pub fn resolve_schema(schema: &Value, definitions: &Definitions) -> Result<ResolvedSchema, ResolveError> {
    let is_array = schema.get("type").is_some();

    let ref_path = if is_array {
        schema
            .get("items")
            .and_then(|items| items.get("$ref"))
            .and_then(Value::as_str)
            .ok_or(ResolveError::MissingItemsRef)?
    } else {
        schema
            .get("$ref")
            .and_then(Value::as_str)
            .ok_or(ResolveError::MissingRef)?
    };

    let fields = definition_fields(ref_path, definitions)?;
    Ok(ResolvedSchema { fields, is_array })
}

fn definition_fields(ref_path: &str, definitions: &Definitions) -> Result<Vec<String>, ResolveError> {
    let name = definition_name(ref_path);
    let definition = definitions
        .get(name)
        .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.to_string()))?;

    let properties = definition
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| ResolveError::MissingProperties(name.to_string()))?;

    Ok(properties.keys().cloned().collect())
}

/// Extract the definition name from `#/definitions/Foo`. References without the
/// prefix are looked up verbatim.
pub fn definition_name(ref_path: &str) -> &str {
    ref_path.strip_prefix(DEFINITIONS_PREFIX).unwrap_or(ref_path)
}
