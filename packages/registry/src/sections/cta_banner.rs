//! Call-to-action banner.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::forms::{decode, encode, string_value, ChangeOp, Field, FieldChange, Form};
use crate::SectionEditor;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CtaBannerData {
    pub heading: String,
    pub body: String,
    pub button_label: String,
    pub button_href: String,
}

pub struct CtaBannerEditor;

impl SectionEditor for CtaBannerEditor {
    fn form(&self, data: &Value) -> Form {
        let d: CtaBannerData = decode(data);
        Form {
            fields: vec![
                Field::text("heading", "Heading", &d.heading),
                Field::textarea("body", "Body", &d.body),
                Field::text("button_label", "Button label", &d.button_label),
                Field::url("button_href", "Button link", &d.button_href),
            ],
        }
    }

    fn update(&self, data: &Value, change: &FieldChange) -> Value {
        let ChangeOp::Set { value } = &change.op else {
            return data.clone();
        };

        let mut d: CtaBannerData = decode(data);
        match change.field.as_str() {
            "heading" => d.heading = string_value(value),
            "body" => d.body = string_value(value),
            "button_label" => d.button_label = string_value(value),
            "button_href" => d.button_href = string_value(value),
            _ => return data.clone(),
        }
        encode(&d)
    }
}

pub fn default_data() -> Value {
    encode(&CtaBannerData {
        heading: "Ready to get started?".to_string(),
        body: String::new(),
        button_label: "Try it now".to_string(),
        button_href: "/tools".to_string(),
    })
}
