use std::fmt;

use crate::document::{Definitions, InvalidParameter, OperationEntry, Parameter, ParameterLocation};
use crate::error::{MalformedEntry, ResolveError};
use crate::resolve::resolve_schema;

/// Position of a field inside a YAML sequence item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMark {
    Plain,
    /// First field of an array body item, rendered with a `- ` prefix.
    SequenceStart,
    /// Later field of the same array body item.
    SequenceItem,
}

/// A placeholder field, rendered as `name: ""`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub mark: FieldMark,
}

impl Field {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mark: FieldMark::Plain,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mark {
            FieldMark::SequenceStart => write!(f, "- {}: \"\"", self.name),
            FieldMark::Plain | FieldMark::SequenceItem => write!(f, "{}: \"\"", self.name),
        }
    }
}

/// An operation's parameters grouped by location. Each bucket keeps source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedParams {
    pub query: Vec<Field>,
    pub form: Vec<Field>,
    pub body: Vec<Field>,
}

impl ClassifiedParams {
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.form.is_empty() && self.body.is_empty()
    }
}

/// Group the parameters of an operation into query, form and body fields.
///
/// Entries that are not objects or carry no string `name` are logged and skipped.
pub fn classify(operation: &OperationEntry<'_>, definitions: &Definitions) -> ClassifiedParams {
    let mut classified = ClassifiedParams::default();

    for (index, value) in operation.parameters.unwrap_or_default().iter().enumerate() {
        let param = match Parameter::from_value(value) {
            Ok(param) => param,
            Err(invalid) => {
                log::warn!("skipping {}", malformed(operation, index, invalid));
                continue;
            }
        };

        match param.location {
            ParameterLocation::Query => classified.query.push(Field::plain(param.name)),
            ParameterLocation::FormData => classified.form.push(Field::plain(param.name)),
            ParameterLocation::Body => classified.body.extend(body_fields(&param, definitions)),
            ParameterLocation::Other => {}
        }
    }

    classified
}

fn body_fields(param: &Parameter<'_>, definitions: &Definitions) -> Vec<Field> {
    let resolved = match param.schema {
        Some(schema) => resolve_schema(schema, definitions),
        None => Err(ResolveError::MissingRef),
    };
    match resolved {
        Ok(resolved) => {
            let mut fields: Vec<Field> = resolved.fields.into_iter().map(Field::plain).collect();
            if resolved.is_array {
                for (i, field) in fields.iter_mut().enumerate() {
                    field.mark = if i == 0 {
                        FieldMark::SequenceStart
                    } else {
                        FieldMark::SequenceItem
                    };
                }
            }
            fields
        }
        Err(err) => {
            log::debug!("body parameter `{}` kept as a single field: {err}", param.name);
            vec![Field::plain(param.name)]
        }
    }
}

fn malformed(operation: &OperationEntry<'_>, index: usize, invalid: InvalidParameter) -> MalformedEntry {
    let path = operation.path.to_string();
    let method = operation.method.to_string();
    match invalid {
        InvalidParameter::NotObject => MalformedEntry::ParameterNotObject {
            path,
            method,
            index,
        },
        InvalidParameter::MissingName => MalformedEntry::ParameterWithoutName {
            path,
            method,
            index,
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn definitions() -> Definitions {
        match json!({
            "Pet": {"properties": {"id": {}, "name": {}, "tag": {}}}
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn run(parameters: Value) -> ClassifiedParams {
        let parameters = parameters.as_array().cloned().unwrap_or_default();
        let entry = OperationEntry {
            path: "/pets",
            method: "post",
            parameters: Some(parameters.as_slice()),
        };
        classify(&entry, &definitions())
    }

    fn lines(fields: &[Field]) -> Vec<String> {
        fields.iter().map(Field::to_string).collect()
    }

    #[test]
    fn test_buckets_keep_source_order() {
        let classified = run(json!([
            {"name": "limit", "in": "query"},
            {"name": "file", "in": "formData"},
            {"name": "offset", "in": "query"},
            {"name": "id", "in": "path"},
            {"name": "X-Trace", "in": "header"},
            {"name": "note", "in": "formData"}
        ]));

        assert_eq!(lines(&classified.query), vec![r#"limit: """#, r#"offset: """#]);
        assert_eq!(lines(&classified.form), vec![r#"file: """#, r#"note: """#]);
        assert!(classified.body.is_empty());
    }

    #[test]
    fn test_body_ref_expands_properties() {
        let classified = run(json!([
            {"name": "body", "in": "body", "schema": {"$ref": "#/definitions/Pet"}}
        ]));
        assert_eq!(
            lines(&classified.body),
            vec![r#"id: """#, r#"name: """#, r#"tag: """#]
        );
        assert!(classified.body.iter().all(|f| f.mark == FieldMark::Plain));
    }

    #[test]
    fn test_array_body_marks_first_field() {
        let classified = run(json!([
            {"name": "body", "in": "body", "schema": {"type": "array", "items": {"$ref": "#/definitions/Pet"}}}
        ]));
        let marks: Vec<FieldMark> = classified.body.iter().map(|f| f.mark).collect();
        assert_eq!(
            marks,
            vec![
                FieldMark::SequenceStart,
                FieldMark::SequenceItem,
                FieldMark::SequenceItem
            ]
        );
        assert_eq!(classified.body[0].to_string(), r#"- id: """#);
        assert_eq!(classified.body[1].to_string(), r#"name: """#);
    }

    #[test]
    fn test_unresolved_body_falls_back_to_name() {
        let classified = run(json!([
            {"name": "payload", "in": "body", "schema": {"$ref": "#/definitions/Nope"}},
            {"name": "raw", "in": "body"}
        ]));
        assert_eq!(lines(&classified.body), vec![r#"payload: """#, r#"raw: """#]);
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let classified = run(json!([
            "limit",
            {"in": "query"},
            {"name": 7, "in": "query"},
            {"name": "page", "in": "query"}
        ]));
        assert_eq!(lines(&classified.query), vec![r#"page: """#]);
    }

    #[test]
    fn test_no_parameters_is_empty() {
        let entry = OperationEntry {
            path: "/pets",
            method: "get",
            parameters: None,
        };
        assert!(classify(&entry, &definitions()).is_empty());
    }
}
