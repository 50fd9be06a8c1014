//! Testimonials: ordered quotes with attribution.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::forms::{
    decode, encode, string_value, ChangeOp, Field, FieldChange, Form, ItemField,
};
use crate::SectionEditor;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TestimonialsData {
    pub heading: String,
    pub quotes: Vec<Quote>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Quote {
    pub quote: String,
    pub author: String,
    pub role: String,
}

pub struct TestimonialsEditor;

impl SectionEditor for TestimonialsEditor {
    fn form(&self, data: &Value) -> Form {
        let d: TestimonialsData = decode(data);
        Form {
            fields: vec![
                Field::text("heading", "Heading", &d.heading),
                Field::list(
                    "quotes",
                    "Quotes",
                    &d.quotes,
                    vec![
                        ItemField::new("quote", "Quote"),
                        ItemField::new("author", "Author"),
                        ItemField::new("role", "Role"),
                    ],
                ),
            ],
        }
    }

    fn update(&self, data: &Value, change: &FieldChange) -> Value {
        let mut d: TestimonialsData = decode(data);
        match (change.field.as_str(), &change.op) {
            ("heading", ChangeOp::Set { value }) => d.heading = string_value(value),
            ("quotes", ChangeOp::ItemAdd) => d.quotes.push(Quote::default()),
            ("quotes", ChangeOp::ItemRemove { index }) => {
                if *index >= d.quotes.len() {
                    return data.clone();
                }
                d.quotes.remove(*index);
            }
            ("quotes", ChangeOp::ItemSet { index, item_field, value }) => {
                let Some(q) = d.quotes.get_mut(*index) else {
                    return data.clone();
                };
                match item_field.as_str() {
                    "quote" => q.quote = string_value(value),
                    "author" => q.author = string_value(value),
                    "role" => q.role = string_value(value),
                    _ => return data.clone(),
                }
            }
            _ => return data.clone(),
        }
        encode(&d)
    }
}

pub fn default_data() -> Value {
    encode(&TestimonialsData {
        heading: "What users say".to_string(),
        quotes: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_then_fill_quote() {
        let empty = default_data();
        let one = TestimonialsEditor.update(&empty, &FieldChange::item_add("quotes"));
        let filled = TestimonialsEditor.update(
            &one,
            &FieldChange::item_set("quotes", 0, "author", json!("Ada")),
        );
        assert_eq!(filled["quotes"][0]["author"], "Ada");
        assert_eq!(filled["quotes"][0]["quote"], "");
    }
}
