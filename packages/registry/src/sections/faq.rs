//! FAQ: ordered question/answer pairs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::forms::{
    decode, encode, string_value, ChangeOp, Field, FieldChange, Form, ItemField,
};
use crate::SectionEditor;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FaqData {
    pub heading: String,
    pub entries: Vec<FaqEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

pub struct FaqEditor;

impl SectionEditor for FaqEditor {
    fn form(&self, data: &Value) -> Form {
        let d: FaqData = decode(data);
        Form {
            fields: vec![
                Field::text("heading", "Heading", &d.heading),
                Field::list(
                    "entries",
                    "Questions",
                    &d.entries,
                    vec![
                        ItemField::new("question", "Question"),
                        ItemField::new("answer", "Answer"),
                    ],
                ),
            ],
        }
    }

    fn update(&self, data: &Value, change: &FieldChange) -> Value {
        let mut d: FaqData = decode(data);
        match (change.field.as_str(), &change.op) {
            ("heading", ChangeOp::Set { value }) => d.heading = string_value(value),
            ("entries", ChangeOp::ItemAdd) => d.entries.push(FaqEntry::default()),
            ("entries", ChangeOp::ItemRemove { index }) => {
                if *index >= d.entries.len() {
                    return data.clone();
                }
                d.entries.remove(*index);
            }
            ("entries", ChangeOp::ItemSet { index, item_field, value }) => {
                let Some(entry) = d.entries.get_mut(*index) else {
                    return data.clone();
                };
                match item_field.as_str() {
                    "question" => entry.question = string_value(value),
                    "answer" => entry.answer = string_value(value),
                    _ => return data.clone(),
                }
            }
            _ => return data.clone(),
        }
        encode(&d)
    }
}

pub fn default_data() -> Value {
    encode(&FaqData {
        heading: "Frequently asked questions".to_string(),
        entries: vec![FaqEntry {
            question: "Is it free?".to_string(),
            answer: "Yes, every tool is free to use.".to_string(),
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_answer_update_keeps_question() {
        let before = json!({"entries": [{"question": "Q?", "answer": "old"}]});
        let after = FaqEditor.update(
            &before,
            &FieldChange::item_set("entries", 0, "answer", json!("new")),
        );
        assert_eq!(after["entries"][0]["question"], "Q?");
        assert_eq!(after["entries"][0]["answer"], "new");
    }
}
