//! Partial updates as an ordered list of field-level operations.
//!
//! The wire shape follows JSON Patch (`op`, `path`, `value`), but only a flat
//! `/field` path is accepted and each resource decodes it into its own closed
//! set of changes, so nothing outside that set can be touched.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PatchOperation {
    /// `add`, `replace` or `remove`.
    pub op: String,
    /// Field pointer such as `/customerName`.
    pub path: String,
    /// `None` only when the member is absent; an explicit `null` is `Some(Value::Null)`.
    #[serde(default, deserialize_with = "present_value")]
    #[schema(value_type = Option<Object>)]
    pub value: Option<Value>,
}

fn present_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// What an operation does to its field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Set(Value),
    Clear,
}

/// A closed set of changes a resource accepts through PATCH.
pub trait FieldChange: Sized {
    /// `field` is the path without its leading slash, lowercased.
    fn decode(field: &str, edit: FieldEdit) -> AppResult<Self>;
}

impl PatchOperation {
    fn field(&self) -> AppResult<String> {
        let field = self
            .path
            .strip_prefix('/')
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .ok_or_else(|| AppError::BadRequest(format!("invalid patch path '{}'", self.path)))?;
        Ok(field.to_ascii_lowercase())
    }

    fn edit(self) -> AppResult<FieldEdit> {
        match self.op.to_ascii_lowercase().as_str() {
            "add" | "replace" => self
                .value
                .map(FieldEdit::Set)
                .ok_or_else(|| AppError::BadRequest(format!("{} requires a value", self.op))),
            "remove" => Ok(FieldEdit::Clear),
            _ => Err(AppError::BadRequest(format!(
                "unsupported patch operation '{}'",
                self.op
            ))),
        }
    }
}

/// Decode a whole document up front, so nothing is applied if any operation is invalid.
pub fn decode_document<C: FieldChange>(operations: Vec<PatchOperation>) -> AppResult<Vec<C>> {
    operations
        .into_iter()
        .map(|operation| {
            let field = operation.field()?;
            let edit = operation.edit()?;
            C::decode(&field, edit)
        })
        .collect()
}

impl FieldEdit {
    /// Value for a non-nullable field; `remove` is rejected.
    pub fn required<T: DeserializeOwned>(self, field: &str) -> AppResult<T> {
        match self {
            FieldEdit::Set(value) => serde_json::from_value(value)
                .map_err(|err| AppError::BadRequest(format!("invalid value for {field}: {err}"))),
            FieldEdit::Clear => Err(AppError::BadRequest(format!("{field} cannot be removed"))),
        }
    }

    /// Value for a nullable field; `remove` and `null` both clear it.
    pub fn optional<T: DeserializeOwned>(self, field: &str) -> AppResult<Option<T>> {
        match self {
            FieldEdit::Set(value) => serde_json::from_value(value)
                .map_err(|err| AppError::BadRequest(format!("invalid value for {field}: {err}"))),
            FieldEdit::Clear => Ok(None),
        }
    }
}

pub fn immutable_field(field: &str) -> AppError {
    AppError::BadRequest(format!("{field} cannot be changed"))
}

pub fn unknown_field(field: &str) -> AppError {
    AppError::BadRequest(format!("unknown field '{field}'"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq)]
    enum NoteChange {
        Body(String),
        Tag(Option<String>),
    }

    impl FieldChange for NoteChange {
        fn decode(field: &str, edit: FieldEdit) -> AppResult<Self> {
            match field {
                "body" => edit.required("body").map(NoteChange::Body),
                "tag" => edit.optional("tag").map(NoteChange::Tag),
                "id" => Err(immutable_field("id")),
                other => Err(unknown_field(other)),
            }
        }
    }

    fn ops(value: Value) -> Vec<PatchOperation> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn decodes_in_order_with_case_insensitive_paths() {
        let changes: Vec<NoteChange> = decode_document(ops(json!([
            { "op": "replace", "path": "/Body", "value": "hi" },
            { "op": "remove", "path": "/tag" },
            { "op": "add", "path": "/tag", "value": "x" }
        ])))
        .unwrap();
        assert_eq!(
            changes,
            vec![
                NoteChange::Body("hi".into()),
                NoteChange::Tag(None),
                NoteChange::Tag(Some("x".into())),
            ]
        );
    }

    #[test]
    fn explicit_null_clears_a_nullable_field() {
        let operations = ops(json!([
            { "op": "replace", "path": "/tag", "value": null },
            { "op": "replace", "path": "/body" }
        ]));
        assert_eq!(operations[0].value, Some(Value::Null));
        assert_eq!(operations[1].value, None);

        let changes: Vec<NoteChange> =
            decode_document(ops(json!([{ "op": "add", "path": "/tag", "value": null }]))).unwrap();
        assert_eq!(changes, vec![NoteChange::Tag(None)]);
    }

    #[test]
    fn rejects_what_is_outside_the_closed_set() {
        for doc in [
            json!([{ "op": "replace", "path": "/id", "value": 3 }]),
            json!([{ "op": "replace", "path": "/owner", "value": "z" }]),
            json!([{ "op": "remove", "path": "/body" }]),
            json!([{ "op": "move", "path": "/body", "value": "z" }]),
            json!([{ "op": "replace", "path": "/body" }]),
            json!([{ "op": "replace", "path": "/body", "value": 7 }]),
            json!([{ "op": "replace", "path": "/body", "value": null }]),
            json!([{ "op": "replace", "path": "body", "value": "z" }]),
            json!([{ "op": "replace", "path": "/body/0", "value": "z" }]),
        ] {
            let result = decode_document::<NoteChange>(ops(doc.clone()));
            assert!(
                matches!(result, Err(AppError::BadRequest(_))),
                "expected rejection for {doc}"
            );
        }
    }
}
