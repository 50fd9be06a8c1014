//! # Form Model
//!
//! The generic vocabulary shared by every section editor: a `Form` is the
//! rendered projection of a section's data (ordered fields), and a
//! `FieldChange` is the single way data flows back. Editors apply changes
//! by whole-object replacement; the previous payload is never mutated in
//! place.
//!
//! Unknown field names and out-of-range list indices are ignored (the
//! editor returns the payload unchanged) so that edits arriving against a
//! stale form can never corrupt data.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered field list for one section's editor.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Form {
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: Value,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum FieldKind {
    Text,
    TextArea,
    Url,
    /// Ordered list of uniform sub-items, edited with add/remove/set-at-index.
    List { item_fields: Vec<ItemField> },
}

/// One column of a list field's items.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ItemField {
    pub name: &'static str,
    pub label: &'static str,
}

impl ItemField {
    pub const fn new(name: &'static str, label: &'static str) -> Self {
        Self { name, label }
    }
}

impl Field {
    pub fn text(name: &'static str, label: &'static str, value: &str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            value: Value::String(value.to_string()),
        }
    }

    pub fn textarea(name: &'static str, label: &'static str, value: &str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::TextArea,
            value: Value::String(value.to_string()),
        }
    }

    pub fn url(name: &'static str, label: &'static str, value: &str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Url,
            value: Value::String(value.to_string()),
        }
    }

    pub fn list<T: Serialize>(
        name: &'static str,
        label: &'static str,
        items: &[T],
        item_fields: Vec<ItemField>,
    ) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::List { item_fields },
            value: encode(&items),
        }
    }
}

/// A single edit emitted by the admin form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldChange {
    pub field: String,

    #[serde(flatten)]
    pub op: ChangeOp,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ChangeOp {
    /// Replace a scalar field.
    Set { value: Value },
    /// Append a default-valued item to a list field.
    ItemAdd,
    /// Remove the item at `index`.
    ItemRemove { index: usize },
    /// Replace one sub-field of the item at `index`.
    ItemSet {
        index: usize,
        item_field: String,
        value: Value,
    },
}

impl FieldChange {
    pub fn set(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: ChangeOp::Set { value },
        }
    }

    pub fn item_add(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: ChangeOp::ItemAdd,
        }
    }

    pub fn item_remove(field: impl Into<String>, index: usize) -> Self {
        Self {
            field: field.into(),
            op: ChangeOp::ItemRemove { index },
        }
    }

    pub fn item_set(
        field: impl Into<String>,
        index: usize,
        item_field: impl Into<String>,
        value: Value,
    ) -> Self {
        Self {
            field: field.into(),
            op: ChangeOp::ItemSet {
                index,
                item_field: item_field.into(),
                value,
            },
        }
    }
}

/// Best-effort decode of a section payload into its typed shape. Missing
/// fields fill from `Default`; a payload of the wrong overall shape decodes
/// to the default value rather than failing, since this layer performs no
/// structural validation.
pub fn decode<T: DeserializeOwned + Default>(data: &Value) -> T {
    serde_json::from_value(data.clone()).unwrap_or_default()
}

/// Serialize a typed shape back into a JSON payload.
pub fn encode<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Coerce a change value into a string field. Non-strings become empty.
pub fn string_value(value: &Value) -> String {
    value.as_str().unwrap_or_default().to_string()
}
