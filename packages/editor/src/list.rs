//! Section list view state.
//!
//! The non-presentational part of the list/row views: which row is
//! expanded for editing (one at a time) and the two-step delete confirm
//! flow. Every actual mutation is delegated to the state machine; this
//! type never touches the network.

use pagecraft_common::Section;
use serde::Serialize;

#[derive(Debug, Default, Clone, Serialize, PartialEq, Eq)]
pub struct ListController {
    expanded: Option<i64>,
    confirming_delete: Option<i64>,
}

impl ListController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand a row for editing; expanding one collapses the previous.
    /// Toggling the already-expanded row collapses it.
    pub fn toggle_expanded(&mut self, id: i64) {
        self.expanded = if self.expanded == Some(id) {
            None
        } else {
            Some(id)
        };
    }

    pub fn expanded(&self) -> Option<i64> {
        self.expanded
    }

    pub fn is_expanded(&self, id: i64) -> bool {
        self.expanded == Some(id)
    }

    /// First step of the delete flow: arm the confirmation for one row.
    /// Arming a different row moves the confirmation there.
    pub fn request_delete(&mut self, id: i64) {
        self.confirming_delete = Some(id);
    }

    /// Second step: take the armed id, clearing the flow. The caller
    /// passes the id to `delete_section`; deletion never happens without
    /// this two-step sequence.
    pub fn confirm_delete(&mut self) -> Option<i64> {
        self.confirming_delete.take()
    }

    pub fn cancel_delete(&mut self) {
        self.confirming_delete = None;
    }

    pub fn confirming_delete(&self) -> Option<i64> {
        self.confirming_delete
    }

    /// Drop view state for rows that no longer exist (after reload,
    /// delete, or an external change picked up by duplicate's refetch).
    pub fn prune(&mut self, sections: &[Section]) {
        let exists = |id: i64| sections.iter().any(|s| s.id == id);
        if self.expanded.is_some_and(|id| !exists(id)) {
            self.expanded = None;
        }
        if self.confirming_delete.is_some_and(|id| !exists(id)) {
            self.confirming_delete = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pagecraft_common::SectionStatus;
    use serde_json::json;

    fn section(id: i64) -> Section {
        let at = Utc.with_ymd_and_hms(2025, 11, 2, 9, 0, 0).unwrap();
        Section {
            id,
            page_key: "home".to_string(),
            component_type: "hero".to_string(),
            component_order: id,
            component_name: format!("Section {id}"),
            component_data: json!({}),
            is_active: true,
            status: SectionStatus::Active,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_one_row_expanded_at_a_time() {
        let mut list = ListController::new();
        list.toggle_expanded(1);
        assert!(list.is_expanded(1));

        list.toggle_expanded(2);
        assert!(list.is_expanded(2));
        assert!(!list.is_expanded(1));

        list.toggle_expanded(2);
        assert_eq!(list.expanded(), None);
    }

    #[test]
    fn test_delete_requires_confirm() {
        let mut list = ListController::new();
        assert_eq!(list.confirm_delete(), None);

        list.request_delete(3);
        assert_eq!(list.confirming_delete(), Some(3));
        assert_eq!(list.confirm_delete(), Some(3));
        // The flow is consumed.
        assert_eq!(list.confirm_delete(), None);
    }

    #[test]
    fn test_cancel_clears_armed_delete() {
        let mut list = ListController::new();
        list.request_delete(3);
        list.cancel_delete();
        assert_eq!(list.confirm_delete(), None);
    }

    #[test]
    fn test_prune_drops_vanished_rows() {
        let mut list = ListController::new();
        list.toggle_expanded(1);
        list.request_delete(2);

        list.prune(&[section(1)]);
        assert!(list.is_expanded(1));
        assert_eq!(list.confirming_delete(), None);

        list.prune(&[]);
        assert_eq!(list.expanded(), None);
    }
}
