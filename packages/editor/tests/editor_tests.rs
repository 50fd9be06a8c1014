//! End-to-end state machine tests against a scripted in-memory backend.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use pagecraft_api::{ApiFailure, ComponentsApi, SectionPatch};
use pagecraft_common::{ReorderItem, Section, SectionStatus};
use pagecraft_editor::{Direction, OpResult, PageEditor};
use pagecraft_registry::FieldChange;
use serde_json::{json, Value};

#[derive(Default)]
struct MockState {
    server: Mutex<Vec<Section>>,
    fail_updates: Mutex<HashSet<i64>>,
    fail_list: Mutex<bool>,
    fail_reorder: Mutex<bool>,
    calls: Mutex<Vec<String>>,
}

/// Scripted backend: holds server-side truth, records calls, and fails
/// on command per id or per endpoint.
#[derive(Clone, Default)]
struct MockApi(Arc<MockState>);

impl MockApi {
    fn seeded(sections: Vec<Section>) -> Self {
        let api = Self::default();
        *api.0.server.lock().unwrap() = sections;
        api
    }

    fn fail_update(&self, id: i64) {
        self.0.fail_updates.lock().unwrap().insert(id);
    }

    fn fail_list(&self, flag: bool) {
        *self.0.fail_list.lock().unwrap() = flag;
    }

    fn fail_reorder(&self, flag: bool) {
        *self.0.fail_reorder.lock().unwrap() = flag;
    }

    fn calls(&self) -> Vec<String> {
        self.0.calls.lock().unwrap().clone()
    }

    fn server_section(&self, id: i64) -> Option<Section> {
        self.0
            .server
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    fn record(&self, call: String) {
        self.0.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ComponentsApi for MockApi {
    async fn list(&self, page_key: &str) -> Result<Vec<Section>, ApiFailure> {
        self.record(format!("list:{page_key}"));
        if *self.0.fail_list.lock().unwrap() {
            return Err(ApiFailure::App {
                message: "list failed".to_string(),
            });
        }
        Ok(self.0.server.lock().unwrap().clone())
    }

    async fn update(&self, id: i64, patch: SectionPatch) -> Result<Section, ApiFailure> {
        self.record(format!("update:{id}"));
        if self.0.fail_updates.lock().unwrap().contains(&id) {
            return Err(ApiFailure::App {
                message: format!("update {id} rejected"),
            });
        }
        let mut server = self.0.server.lock().unwrap();
        let section = server
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ApiFailure::App {
                message: "component not found".to_string(),
            })?;
        if let Some(data) = patch.component_data {
            section.component_data = data;
        }
        if let Some(active) = patch.is_active {
            section.is_active = active;
        }
        if let Some(status) = patch.status {
            section.status = status;
        }
        if let Some(name) = patch.component_name {
            section.component_name = name;
        }
        if let Some(order) = patch.component_order {
            section.component_order = order;
        }
        Ok(section.clone())
    }

    async fn duplicate(&self, id: i64) -> Result<Section, ApiFailure> {
        self.record(format!("duplicate:{id}"));
        let mut server = self.0.server.lock().unwrap();
        let original = server
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| ApiFailure::App {
                message: "component not found".to_string(),
            })?;
        let next_id = server.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let next_order = server.iter().map(|s| s.component_order).max().unwrap_or(0) + 1;
        let copy = Section {
            id: next_id,
            component_order: next_order,
            status: SectionStatus::Draft,
            component_name: format!("{} (copy)", original.component_name),
            ..original
        };
        server.push(copy.clone());
        Ok(copy)
    }

    async fn delete(&self, id: i64) -> Result<(), ApiFailure> {
        self.record(format!("delete:{id}"));
        let mut server = self.0.server.lock().unwrap();
        let before = server.len();
        server.retain(|s| s.id != id);
        if server.len() == before {
            return Err(ApiFailure::App {
                message: "component not found".to_string(),
            });
        }
        Ok(())
    }

    async fn reorder(&self, items: Vec<ReorderItem>) -> Result<(), ApiFailure> {
        self.record(format!("reorder:{}", items.len()));
        if *self.0.fail_reorder.lock().unwrap() {
            return Err(ApiFailure::transport("connection reset"));
        }
        let mut server = self.0.server.lock().unwrap();
        for item in items {
            if let Some(section) = server.iter_mut().find(|s| s.id == item.id) {
                section.component_order = item.component_order;
            }
        }
        Ok(())
    }
}

fn section(id: i64, kind: &str, order: i64, data: Value) -> Section {
    let at = Utc.with_ymd_and_hms(2025, 11, 2, 9, 0, 0).unwrap();
    Section {
        id,
        page_key: "home".to_string(),
        component_type: kind.to_string(),
        component_order: order,
        component_name: format!("Section {id}"),
        component_data: data,
        is_active: true,
        status: SectionStatus::Active,
        created_at: at,
        updated_at: at,
    }
}

async fn editor_for(sections: Vec<Section>) -> (MockApi, PageEditor<MockApi>) {
    let api = MockApi::seeded(sections);
    let mut editor = PageEditor::new(api.clone(), "home");
    assert!(editor.load().await.applied());
    (api, editor)
}

// ----------------------------------------------------------------------
// Load
// ----------------------------------------------------------------------

#[tokio::test]
async fn test_load_sorts_by_order() {
    let (_, editor) = editor_for(vec![
        section(2, "faq", 3, json!({})),
        section(1, "hero", 1, json!({})),
        section(3, "steps", 2, json!({})),
    ])
    .await;

    let ids: Vec<i64> = editor.sections().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 3, 2]);
}

#[tokio::test]
async fn test_reload_discards_pending() {
    // Any reload empties the pending set, whatever it held.
    let (_, mut editor) = editor_for(vec![
        section(1, "hero", 1, json!({"heading": "A"})),
        section(2, "faq", 2, json!({})),
    ])
    .await;

    editor.on_field_change(1, json!({"heading": "draft"}));
    editor.on_field_change(2, json!({"entries": []}));
    assert_eq!(editor.pending_count(), 2);

    assert!(editor.load().await.applied());
    assert_eq!(editor.pending_count(), 0);
    assert_eq!(editor.live_data(1), json!({"heading": "A"}));
}

#[tokio::test]
async fn test_failed_load_leaves_prior_state_untouched() {
    let (api, mut editor) = editor_for(vec![section(1, "hero", 1, json!({"heading": "A"}))]).await;
    editor.on_field_change(1, json!({"heading": "draft"}));

    api.fail_list(true);
    let outcome = editor.load().await;
    assert!(matches!(outcome, OpResult::Failed { .. }));

    assert_eq!(editor.sections().len(), 1);
    assert_eq!(editor.live_data(1), json!({"heading": "draft"}));
    let notices = editor.drain_notices();
    assert!(!notices.is_empty());
}

// ----------------------------------------------------------------------
// Pending edits and save-one
// ----------------------------------------------------------------------

#[tokio::test]
async fn test_pending_precedence_and_save_scenario() {
    // Edit section 1, check live reads, save, check
    // promotion.
    let (_, mut editor) = editor_for(vec![
        section(1, "hero", 1, json!({"title": "old"})),
        section(2, "cta_banner", 2, json!({"heading": "keep"})),
    ])
    .await;

    editor.on_field_change(1, json!({"title": "X"}));
    assert_eq!(editor.live_data(1)["title"], "X");
    assert_eq!(editor.live_data(2), json!({"heading": "keep"}));
    assert!(editor.is_dirty(1));
    assert!(!editor.is_dirty(2));

    assert!(editor.save_one(1).await.applied());
    assert_eq!(editor.pending_count(), 0);
    assert_eq!(editor.sections()[0].component_data["title"], "X");
}

#[tokio::test]
async fn test_live_data_for_unknown_id_is_empty_object() {
    let (_, editor) = editor_for(vec![]).await;
    assert_eq!(editor.live_data(99), json!({}));
}

#[tokio::test]
async fn test_field_change_replaces_not_merges() {
    let (_, mut editor) =
        editor_for(vec![section(1, "hero", 1, json!({"title": "a", "sub": "b"}))]).await;

    editor.on_field_change(1, json!({"title": "c"}));
    // Whole-object replacement: the old "sub" key is gone from the draft.
    assert_eq!(editor.live_data(1), json!({"title": "c"}));
}

#[tokio::test]
async fn test_save_one_without_pending_is_noop() {
    let (api, mut editor) = editor_for(vec![section(1, "hero", 1, json!({}))]).await;

    let outcome = editor.save_one(1).await;
    assert!(matches!(outcome, OpResult::Noop { .. }));
    assert!(!api.calls().iter().any(|c| c.starts_with("update:")));
}

#[tokio::test]
async fn test_failed_save_preserves_pending() {
    // Pending contains the id iff the save failed.
    let (api, mut editor) = editor_for(vec![section(1, "hero", 1, json!({"title": "old"}))]).await;

    api.fail_update(1);
    editor.on_field_change(1, json!({"title": "draft"}));
    let outcome = editor.save_one(1).await;

    assert!(matches!(outcome, OpResult::Failed { .. }));
    assert!(editor.is_dirty(1));
    assert_eq!(editor.live_data(1)["title"], "draft");
    assert_eq!(editor.sections()[0].component_data["title"], "old");
}

#[tokio::test]
async fn test_discard_reverts_to_persisted() {
    let (_, mut editor) = editor_for(vec![section(1, "hero", 1, json!({"title": "old"}))]).await;

    editor.on_field_change(1, json!({"title": "draft"}));
    assert!(editor.discard_changes(1).applied());
    assert_eq!(editor.live_data(1)["title"], "old");

    // Discarding again is a reported no-op.
    assert!(matches!(editor.discard_changes(1), OpResult::Noop { .. }));
}

// ----------------------------------------------------------------------
// Save-all
// ----------------------------------------------------------------------

#[tokio::test]
async fn test_save_all_partial_failure_isolation() {
    // B fails, A and C succeed; pending ends as exactly {B}.
    let (api, mut editor) = editor_for(vec![
        section(1, "hero", 1, json!({"title": "a"})),
        section(2, "faq", 2, json!({"heading": "b"})),
        section(3, "cta_banner", 3, json!({"heading": "c"})),
    ])
    .await;

    api.fail_update(2);
    editor.on_field_change(1, json!({"title": "a2"}));
    editor.on_field_change(2, json!({"heading": "b2"}));
    editor.on_field_change(3, json!({"heading": "c2"}));

    let report = editor.save_all().await;
    assert_eq!(report.saved, 2);
    assert_eq!(report.failed, 1);

    assert!(!editor.is_dirty(1));
    assert!(editor.is_dirty(2));
    assert!(!editor.is_dirty(3));
    assert_eq!(editor.sections()[0].component_data["title"], "a2");
    assert_eq!(editor.sections()[1].component_data["heading"], "b");
    assert_eq!(editor.sections()[2].component_data["heading"], "c2");
}

#[tokio::test]
async fn test_save_all_with_nothing_pending_reports_not_errors() {
    let (api, mut editor) = editor_for(vec![section(1, "hero", 1, json!({}))]).await;

    let report = editor.save_all().await;
    assert_eq!(report.saved, 0);
    assert_eq!(report.failed, 0);
    assert!(!api.calls().iter().any(|c| c.starts_with("update:")));
}

// ----------------------------------------------------------------------
// Visibility toggle
// ----------------------------------------------------------------------

#[tokio::test]
async fn test_toggle_flips_immediately_and_bypasses_pending() {
    let (api, mut editor) = editor_for(vec![section(1, "hero", 1, json!({"title": "old"}))]).await;

    editor.on_field_change(1, json!({"title": "draft"}));
    assert!(editor.toggle_visibility(1).await.applied());

    assert!(!editor.sections()[0].is_active);
    // The draft edit is untouched: visibility is not a draft field.
    assert!(editor.is_dirty(1));
    assert_eq!(api.server_section(1).unwrap().is_active, false);
}

#[tokio::test]
async fn test_failed_toggle_changes_nothing() {
    let (api, mut editor) = editor_for(vec![section(1, "hero", 1, json!({}))]).await;

    api.fail_update(1);
    let outcome = editor.toggle_visibility(1).await;
    assert!(matches!(outcome, OpResult::Failed { .. }));
    assert!(editor.sections()[0].is_active);
}

// ----------------------------------------------------------------------
// Duplicate and delete
// ----------------------------------------------------------------------

#[tokio::test]
async fn test_duplicate_reloads_to_pick_up_server_row() {
    let (api, mut editor) = editor_for(vec![section(1, "hero", 1, json!({"title": "a"}))]).await;

    assert!(editor.duplicate(1).await.applied());
    assert_eq!(editor.sections().len(), 2);

    let copy = &editor.sections()[1];
    // Server-assigned identity, not synthesized locally.
    assert_eq!(copy.id, 2);
    assert_eq!(copy.component_order, 2);
    assert_eq!(copy.status, SectionStatus::Draft);
    assert!(api.calls().contains(&"duplicate:1".to_string()));
}

#[tokio::test]
async fn test_delete_removes_row_and_pending() {
    let (_, mut editor) = editor_for(vec![
        section(1, "hero", 1, json!({})),
        section(2, "faq", 2, json!({})),
    ])
    .await;

    editor.on_field_change(2, json!({"heading": "draft"}));
    assert!(editor.delete_section(2).await.applied());

    assert_eq!(editor.sections().len(), 1);
    assert!(!editor.is_dirty(2));
    assert_eq!(editor.live_data(2), json!({}));
}

#[tokio::test]
async fn test_delete_unknown_id_is_noop() {
    let (api, mut editor) = editor_for(vec![section(1, "hero", 1, json!({}))]).await;

    let outcome = editor.delete_section(42).await;
    assert!(matches!(outcome, OpResult::Noop { .. }));
    assert!(!api.calls().iter().any(|c| c.starts_with("delete:")));
}

// ----------------------------------------------------------------------
// Reorder
// ----------------------------------------------------------------------

#[tokio::test]
async fn test_move_swaps_neighbors() {
    // Orders 1 and 2; moving the second up swaps the ids.
    let (_, mut editor) = editor_for(vec![
        section(10, "hero", 1, json!({})),
        section(20, "faq", 2, json!({})),
    ])
    .await;

    assert!(editor.move_section(20, Direction::Up).await.applied());
    let ids: Vec<i64> = editor.sections().iter().map(|s| s.id).collect();
    let orders: Vec<i64> = editor.sections().iter().map(|s| s.component_order).collect();
    assert_eq!(ids, vec![20, 10]);
    assert_eq!(orders, vec![1, 2]);
}

#[tokio::test]
async fn test_move_normalizes_sparse_orders_to_dense() {
    // Whatever the persisted ranks were, a reorder leaves 1..N.
    let (_, mut editor) = editor_for(vec![
        section(1, "hero", 2, json!({})),
        section(2, "faq", 5, json!({})),
        section(3, "steps", 9, json!({})),
    ])
    .await;

    assert!(editor.move_section(3, Direction::Up).await.applied());
    let orders: Vec<i64> = editor.sections().iter().map(|s| s.component_order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_move_boundaries_are_noops() {
    // First up and last down change nothing and hit no endpoint.
    let (api, mut editor) = editor_for(vec![
        section(1, "hero", 1, json!({})),
        section(2, "faq", 2, json!({})),
    ])
    .await;

    assert!(matches!(
        editor.move_section(1, Direction::Up).await,
        OpResult::Noop { .. }
    ));
    assert!(matches!(
        editor.move_section(2, Direction::Down).await,
        OpResult::Noop { .. }
    ));

    let ids: Vec<i64> = editor.sections().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert!(!api.calls().iter().any(|c| c.starts_with("reorder:")));
}

#[tokio::test]
async fn test_move_persists_complete_replacement_set() {
    let (api, mut editor) = editor_for(vec![
        section(1, "hero", 1, json!({})),
        section(2, "faq", 2, json!({})),
        section(3, "steps", 3, json!({})),
    ])
    .await;

    editor.move_section(2, Direction::Down).await;
    // All three (id, order) pairs go over the wire, not a delta.
    assert!(api.calls().contains(&"reorder:3".to_string()));
}

#[tokio::test]
async fn test_move_applies_optimistically_before_persistence_settles() {
    // With both reorder and the resync load failing, what remains is the
    // optimistic local application.
    let (api, mut editor) = editor_for(vec![
        section(1, "hero", 1, json!({})),
        section(2, "faq", 2, json!({})),
    ])
    .await;

    api.fail_reorder(true);
    api.fail_list(true);
    let outcome = editor.move_section(2, Direction::Up).await;
    assert!(matches!(outcome, OpResult::Failed { .. }));

    let ids: Vec<i64> = editor.sections().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn test_failed_move_resyncs_from_server_not_rollback() {
    let (api, mut editor) = editor_for(vec![
        section(1, "hero", 1, json!({})),
        section(2, "faq", 2, json!({})),
    ])
    .await;

    api.fail_reorder(true);
    let outcome = editor.move_section(2, Direction::Up).await;
    assert!(matches!(outcome, OpResult::Failed { .. }));

    // Ground truth refetched: server never applied the swap.
    let ids: Vec<i64> = editor.sections().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert!(api.calls().iter().filter(|c| c.starts_with("list:")).count() >= 2);
}

// ----------------------------------------------------------------------
// Registry-routed field changes
// ----------------------------------------------------------------------

#[tokio::test]
async fn test_field_change_routed_through_registered_editor() {
    let (_, mut editor) =
        editor_for(vec![section(1, "hero", 1, json!({"heading": "old"}))]).await;

    let outcome = editor.apply_field_change(1, &FieldChange::set("heading", json!("new")));
    assert!(outcome.applied());
    assert_eq!(editor.live_data(1)["heading"], "new");
    assert!(editor.is_dirty(1));
}

#[tokio::test]
async fn test_unregistered_type_is_nonfatal() {
    // No registered editor: no panic, row untouched.
    let (_, mut editor) =
        editor_for(vec![section(1, "mystery_widget", 1, json!({"x": 1}))]).await;

    let outcome = editor.apply_field_change(1, &FieldChange::set("x", json!(2)));
    assert!(matches!(outcome, OpResult::Noop { .. }));
    assert!(!editor.is_dirty(1));
    assert_eq!(editor.live_data(1), json!({"x": 1}));

    let notices = editor.drain_notices();
    assert!(notices.iter().any(|n| n.message.contains("mystery_widget")));
}

// ----------------------------------------------------------------------
// Preview integration
// ----------------------------------------------------------------------

#[tokio::test]
async fn test_preview_receives_merged_state_on_every_change() {
    let (_, mut editor) = editor_for(vec![
        section(1, "hero", 1, json!({"title": "persisted"})),
        section(2, "faq", 2, json!({})),
    ])
    .await;

    editor.on_field_change(1, json!({"title": "draft"}));
    let snapshot = editor.bridge().latest().expect("bridge synced");
    assert_eq!(snapshot.components[0].data, json!({"title": "draft"}));
    assert_eq!(snapshot.components[1].data, json!({}));

    assert!(editor.save_one(1).await.applied());
    let snapshot = editor.bridge().latest().unwrap();
    assert_eq!(snapshot.components[0].data, json!({"title": "draft"}));
}

#[tokio::test]
async fn test_preview_reflects_optimistic_reorder() {
    let (_, mut editor) = editor_for(vec![
        section(1, "hero", 1, json!({})),
        section(2, "faq", 2, json!({})),
    ])
    .await;

    editor.move_section(2, Direction::Up).await;
    let snapshot = editor.bridge().latest().unwrap();
    let ids: Vec<i64> = snapshot.components.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![2, 1]);
}
