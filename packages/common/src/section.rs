//! # Section Model
//!
//! A page is an ordered list of typed sections. Each section carries a
//! JSON payload whose shape is owned by the registry entry for its
//! `component_type`; nothing in this crate inspects the payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One ordered, typed, JSON-configured content block on a page.
///
/// `id` is server-assigned and immutable. `component_order` is a dense
/// per-page ranking: duplicates may appear transiently, but every reorder
/// renumbers the page back to 1..N.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub id: i64,
    pub page_key: String,
    pub component_type: String,
    pub component_order: i64,
    pub component_name: String,
    pub component_data: Value,
    pub is_active: bool,
    pub status: SectionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle tag, independent of `is_active`. Draft sections are excluded
/// from the public render but still appear in the admin list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SectionStatus {
    Active,
    Draft,
    Archived,
}

/// Wire shape for persisting a reordering. Always sent as the complete
/// replacement set of (id, order) pairs for the page, never as deltas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReorderItem {
    pub id: i64,
    pub component_order: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_round_trips_through_json() {
        let json = r#"{
            "id": 7,
            "page_key": "home",
            "component_type": "hero",
            "component_order": 1,
            "component_name": "Hero",
            "component_data": {"heading": "Welcome"},
            "is_active": true,
            "status": "draft",
            "created_at": "2025-11-02T09:00:00Z",
            "updated_at": "2025-11-02T09:30:00Z"
        }"#;

        let section: Section = serde_json::from_str(json).unwrap();
        assert_eq!(section.id, 7);
        assert_eq!(section.status, SectionStatus::Draft);
        assert_eq!(section.component_data["heading"], "Welcome");

        let back = serde_json::to_value(&section).unwrap();
        assert_eq!(back["status"], "draft");
    }

    #[test]
    fn test_reorder_item_wire_shape() {
        let item = ReorderItem {
            id: 3,
            component_order: 2,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json, serde_json::json!({"id": 3, "component_order": 2}));
    }
}
