//! Hero banner: the headline block at the top of a page.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::forms::{decode, encode, string_value, ChangeOp, Field, FieldChange, Form};
use crate::SectionEditor;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeroData {
    pub heading: String,
    pub subheading: String,
    pub cta_label: String,
    pub cta_href: String,
    pub background_url: String,
}

pub struct HeroEditor;

impl SectionEditor for HeroEditor {
    fn form(&self, data: &Value) -> Form {
        let d: HeroData = decode(data);
        Form {
            fields: vec![
                Field::text("heading", "Heading", &d.heading),
                Field::textarea("subheading", "Subheading", &d.subheading),
                Field::text("cta_label", "Button label", &d.cta_label),
                Field::url("cta_href", "Button link", &d.cta_href),
                Field::url("background_url", "Background image", &d.background_url),
            ],
        }
    }

    fn update(&self, data: &Value, change: &FieldChange) -> Value {
        let ChangeOp::Set { value } = &change.op else {
            return data.clone();
        };

        let mut d: HeroData = decode(data);
        match change.field.as_str() {
            "heading" => d.heading = string_value(value),
            "subheading" => d.subheading = string_value(value),
            "cta_label" => d.cta_label = string_value(value),
            "cta_href" => d.cta_href = string_value(value),
            "background_url" => d.background_url = string_value(value),
            _ => return data.clone(),
        }
        encode(&d)
    }
}

pub fn default_data() -> Value {
    encode(&HeroData {
        heading: "Every tool you need, in one place".to_string(),
        subheading: "Convert, compress and edit your files right in the browser.".to_string(),
        cta_label: "Browse tools".to_string(),
        cta_href: "/tools".to_string(),
        background_url: String::new(),
    })
}
