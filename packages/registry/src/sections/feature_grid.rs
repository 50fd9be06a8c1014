//! Feature grid: a heading over an ordered list of feature cards.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::forms::{
    decode, encode, string_value, ChangeOp, Field, FieldChange, Form, ItemField,
};
use crate::SectionEditor;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeatureGridData {
    pub heading: String,
    pub items: Vec<FeatureItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeatureItem {
    pub icon: String,
    pub title: String,
    pub body: String,
}

pub struct FeatureGridEditor;

impl SectionEditor for FeatureGridEditor {
    fn form(&self, data: &Value) -> Form {
        let d: FeatureGridData = decode(data);
        Form {
            fields: vec![
                Field::text("heading", "Heading", &d.heading),
                Field::list(
                    "items",
                    "Features",
                    &d.items,
                    vec![
                        ItemField::new("icon", "Icon"),
                        ItemField::new("title", "Title"),
                        ItemField::new("body", "Body"),
                    ],
                ),
            ],
        }
    }

    fn update(&self, data: &Value, change: &FieldChange) -> Value {
        let mut d: FeatureGridData = decode(data);
        match (change.field.as_str(), &change.op) {
            ("heading", ChangeOp::Set { value }) => d.heading = string_value(value),
            ("items", ChangeOp::ItemAdd) => d.items.push(FeatureItem::default()),
            ("items", ChangeOp::ItemRemove { index }) => {
                if *index >= d.items.len() {
                    return data.clone();
                }
                d.items.remove(*index);
            }
            ("items", ChangeOp::ItemSet { index, item_field, value }) => {
                let Some(item) = d.items.get_mut(*index) else {
                    return data.clone();
                };
                match item_field.as_str() {
                    "icon" => item.icon = string_value(value),
                    "title" => item.title = string_value(value),
                    "body" => item.body = string_value(value),
                    _ => return data.clone(),
                }
            }
            _ => return data.clone(),
        }
        encode(&d)
    }
}

pub fn default_data() -> Value {
    encode(&FeatureGridData {
        heading: "Why people use us".to_string(),
        items: vec![
            FeatureItem {
                icon: "zap".to_string(),
                title: "Fast".to_string(),
                body: "Everything runs in your browser.".to_string(),
            },
            FeatureItem {
                icon: "lock".to_string(),
                title: "Private".to_string(),
                body: "Files never leave your device.".to_string(),
            },
        ],
    })
}
