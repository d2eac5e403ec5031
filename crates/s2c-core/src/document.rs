use serde_json::{Map, Value};

use crate::error::{MalformedEntry, ParseError};

/// Prefix of every `$ref` that points into the `definitions` table.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Definition table keyed by definition name.
pub type Definitions = Map<String, Value>;

/// Path-item keys that never hold an operation.
const NON_OPERATION_KEYS: &[&str] = &["parameters", "$ref"];

/// A parsed Swagger 2.0 document.
///
/// Only `paths` and `definitions` are retained. Both keep the key order of the
/// source JSON, so walking the document is deterministic for a given input.
#[derive(Debug, Clone)]
pub struct Document {
    swagger: Option<String>,
    paths: Map<String, Value>,
    definitions: Definitions,
}

impl Document {
    /// Parse a document from raw response bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Parse a document from a JSON string.
    pub fn from_json(input: &str) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ParseError> {
        let Value::Object(mut root) = value else {
            return Err(ParseError::NotAnObject);
        };

        let paths = match root.remove("paths") {
            Some(Value::Object(paths)) => paths,
            _ => return Err(ParseError::MissingField("paths".to_string())),
        };

        let definitions = match root.remove("definitions") {
            Some(Value::Object(definitions)) => definitions,
            Some(_) => {
                log::warn!("`definitions` is not an object; body references will not resolve");
                Map::new()
            }
            None => Map::new(),
        };

        let swagger = root
            .get("swagger")
            .and_then(Value::as_str)
            .map(str::to_string);
        match swagger.as_deref() {
            Some(version) if version.starts_with("2.") => {}
            Some(version) => log::warn!("expected a Swagger 2.x document, got version {version}"),
            None => log::warn!("document has no `swagger` version field"),
        }

        Ok(Self {
            swagger,
            paths,
            definitions,
        })
    }

    pub fn swagger_version(&self) -> Option<&str> {
        self.swagger.as_deref()
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    /// Iterate every `(path, method)` pair. Entries with an unexpected shape are
    /// yielded as errors so the caller can report them and carry on.
    pub fn operations(&self) -> impl Iterator<Item = Result<OperationEntry<'_>, MalformedEntry>> {
        self.paths.iter().flat_map(|(path, item)| {
            let entries: Vec<Result<OperationEntry<'_>, MalformedEntry>> = match item.as_object() {
                Some(methods) => methods
                    .iter()
                    .filter(|(method, _)| is_operation_key(method))
                    .map(|(method, operation)| OperationEntry::from_value(path, method, operation))
                    .collect(),
                None => vec![Err(MalformedEntry::PathItemNotObject { path: path.clone() })],
            };
            entries
        })
    }
}

fn is_operation_key(key: &str) -> bool {
    !NON_OPERATION_KEYS.contains(&key) && !key.starts_with("x-")
}

/// A single operation of a path item.
#[derive(Debug, Clone, Copy)]
pub struct OperationEntry<'a> {
    pub path: &'a str,
    pub method: &'a str,
    /// `None` when the operation declares no `parameters` key.
    pub parameters: Option<&'a [Value]>,
}

impl<'a> OperationEntry<'a> {
    fn from_value(path: &'a str, method: &'a str, value: &'a Value) -> Result<Self, MalformedEntry> {
        let operation = value
            .as_object()
            .ok_or_else(|| MalformedEntry::OperationNotObject {
                path: path.to_string(),
                method: method.to_string(),
            })?;

        let parameters = match operation.get("parameters") {
            None => None,
            Some(Value::Array(parameters)) => Some(parameters.as_slice()),
            Some(_) => {
                return Err(MalformedEntry::ParametersNotArray {
                    path: path.to_string(),
                    method: method.to_string(),
                });
            }
        };

        Ok(Self {
            path,
            method,
            parameters,
        })
    }
}

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Query,
    FormData,
    Body,
    /// `path`, `header`, missing, or anything else. Never rendered.
    Other,
}

impl ParameterLocation {
    pub fn from_in(value: Option<&str>) -> Self {
        match value {
            Some("query") => Self::Query,
            Some("formData") => Self::FormData,
            Some("body") => Self::Body,
            _ => Self::Other,
        }
    }
}

/// Borrowed view over a parameter object.
#[derive(Debug, Clone, Copy)]
pub struct Parameter<'a> {
    pub name: &'a str,
    pub location: ParameterLocation,
    pub schema: Option<&'a Value>,
}

/// Why a parameter entry could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidParameter {
    NotObject,
    MissingName,
}

impl<'a> Parameter<'a> {
    pub fn from_value(value: &'a Value) -> Result<Self, InvalidParameter> {
        let object = value.as_object().ok_or(InvalidParameter::NotObject)?;
        let name = object
            .get("name")
            .and_then(Value::as_str)
            .ok_or(InvalidParameter::MissingName)?;
        Ok(Self {
            name,
            location: ParameterLocation::from_in(object.get("in").and_then(Value::as_str)),
            schema: object.get("schema"),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_rejects_non_object_root() {
        let err = Document::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, ParseError::NotAnObject));
    }

    #[test]
    fn test_rejects_invalid_json() {
        let err = Document::from_slice(b"{\"paths\": ").unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn test_requires_paths() {
        let err = Document::from_json(r#"{"swagger": "2.0"}"#).unwrap_err();
        assert!(matches!(err, ParseError::MissingField(ref f) if f == "paths"));
    }

    #[test]
    fn test_missing_definitions_is_empty() {
        let doc = Document::from_json(r#"{"swagger": "2.0", "paths": {}}"#).unwrap();
        assert!(doc.definitions().is_empty());
        assert_eq!(doc.swagger_version(), Some("2.0"));
    }

    #[test]
    fn test_operations_skip_non_operation_keys() {
        let doc = Document::from_value(json!({
            "paths": {
                "/pets": {
                    "parameters": [{"name": "x", "in": "query"}],
                    "x-internal": true,
                    "get": {"parameters": []},
                    "post": {}
                }
            }
        }))
        .unwrap();

        let ops: Vec<_> = doc.operations().collect::<Result<_, _>>().unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].method, "get");
        assert_eq!(ops[0].parameters.map(<[Value]>::len), Some(0));
        assert_eq!(ops[1].method, "post");
        assert!(ops[1].parameters.is_none());
    }

    #[test]
    fn test_operations_report_malformed_entries() {
        let doc = Document::from_value(json!({
            "paths": {
                "/a": "nope",
                "/b": {"get": 3, "put": {"parameters": {}}}
            }
        }))
        .unwrap();

        let results: Vec<_> = doc.operations().collect();
        assert_eq!(results.len(), 3);
        assert!(matches!(results[0], Err(MalformedEntry::PathItemNotObject { .. })));
        assert!(matches!(results[1], Err(MalformedEntry::OperationNotObject { .. })));
        assert!(matches!(results[2], Err(MalformedEntry::ParametersNotArray { .. })));
    }

    #[test]
    fn test_parameter_view() {
        let value = json!({"name": "limit", "in": "query"});
        let param = Parameter::from_value(&value).unwrap();
        assert_eq!(param.name, "limit");
        assert_eq!(param.location, ParameterLocation::Query);
        assert!(param.schema.is_none());

        let header = json!({"name": "X-Token", "in": "header"});
        let param = Parameter::from_value(&header).unwrap();
        assert_eq!(param.location, ParameterLocation::Other);

        assert_eq!(
            Parameter::from_value(&json!("limit")).unwrap_err(),
            InvalidParameter::NotObject
        );
        assert_eq!(
            Parameter::from_value(&json!({"in": "query"})).unwrap_err(),
            InvalidParameter::MissingName
        );
    }
}
