//! How-it-works steps: numbered walkthrough of the product flow.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::forms::{
    decode, encode, string_value, ChangeOp, Field, FieldChange, Form, ItemField,
};
use crate::SectionEditor;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StepsData {
    pub heading: String,
    pub steps: Vec<StepItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StepItem {
    pub title: String,
    pub body: String,
}

pub struct StepsEditor;

impl SectionEditor for StepsEditor {
    fn form(&self, data: &Value) -> Form {
        let d: StepsData = decode(data);
        Form {
            fields: vec![
                Field::text("heading", "Heading", &d.heading),
                Field::list(
                    "steps",
                    "Steps",
                    &d.steps,
                    vec![
                        ItemField::new("title", "Title"),
                        ItemField::new("body", "Body"),
                    ],
                ),
            ],
        }
    }

    fn update(&self, data: &Value, change: &FieldChange) -> Value {
        let mut d: StepsData = decode(data);
        match (change.field.as_str(), &change.op) {
            ("heading", ChangeOp::Set { value }) => d.heading = string_value(value),
            ("steps", ChangeOp::ItemAdd) => d.steps.push(StepItem::default()),
            ("steps", ChangeOp::ItemRemove { index }) => {
                if *index >= d.steps.len() {
                    return data.clone();
                }
                d.steps.remove(*index);
            }
            ("steps", ChangeOp::ItemSet { index, item_field, value }) => {
                let Some(step) = d.steps.get_mut(*index) else {
                    return data.clone();
                };
                match item_field.as_str() {
                    "title" => step.title = string_value(value),
                    "body" => step.body = string_value(value),
                    _ => return data.clone(),
                }
            }
            _ => return data.clone(),
        }
        encode(&d)
    }
}

pub fn default_data() -> Value {
    encode(&StepsData {
        heading: "How it works".to_string(),
        steps: vec![
            StepItem {
                title: "Pick a tool".to_string(),
                body: "Choose from converters, compressors and editors.".to_string(),
            },
            StepItem {
                title: "Drop your file".to_string(),
                body: "Processing happens locally.".to_string(),
            },
            StepItem {
                title: "Download".to_string(),
                body: "Grab the result, no signup needed.".to_string(),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_step_title_update() {
        let before = json!({"steps": [{"title": "One", "body": ""}]});
        let after =
            StepsEditor.update(&before, &FieldChange::item_set("steps", 0, "title", json!("1.")));
        assert_eq!(after["steps"][0]["title"], "1.");
    }

    #[test]
    fn test_default_data_round_trips() {
        let d: StepsData = decode(&default_data());
        assert_eq!(d.steps.len(), 3);
    }
}
