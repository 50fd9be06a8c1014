//! # Page Editor State Machine
//!
//! Single source of truth for everything the admin UI shows about one
//! page: the persisted section list, the set of unsaved edits and the
//! per-row in-flight flags. Every view reads through this type and every
//! mutation goes through one of its operations.
//!
//! ## Guarantees
//!
//! - Pending edits always win over persisted data (`live_data`).
//! - A failed mutating call leaves state exactly as if it had not been
//!   attempted, except reorder, which resynchronizes from the server
//!   instead of rolling back locally.
//! - No operation returns `Err`; outcomes settle as [`OpResult`] and are
//!   mirrored into the notice queue.
//! - Reloading always discards unsaved work. That is a deliberate,
//!   documented data-loss point, not a bug.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use pagecraft_api::{ApiFailure, ComponentsApi, SectionPatch};
use pagecraft_common::{Notice, ReorderItem, Section};
use pagecraft_preview::PreviewBridge;
use pagecraft_registry::FieldChange;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::notify::NoticeQueue;

/// Settled outcome of a single editor operation.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum OpResult {
    Applied,
    Noop { reason: String },
    Failed { message: String },
}

impl OpResult {
    fn noop(reason: &str) -> Self {
        Self::Noop {
            reason: reason.to_string(),
        }
    }

    pub fn applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Aggregate outcome of `save_all`: best-effort batch, per-entry
/// isolation, never all-or-nothing.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct SaveAllReport {
    pub saved: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

pub struct PageEditor<A> {
    api: A,
    page_key: String,
    bridge: Arc<PreviewBridge>,

    /// Persisted list, kept sorted by `component_order` ascending.
    sections: Vec<Section>,

    /// Unsaved whole-object replacements, keyed by section id. Presence
    /// means "local data differs from last-known-persisted data".
    pending: HashMap<i64, Value>,

    loading: bool,
    saving: HashSet<i64>,
    saving_all: bool,
    deleting: HashSet<i64>,
    duplicating: HashSet<i64>,

    /// Load generation stamp; a completed fetch applies only if no newer
    /// load superseded it.
    generation: u64,

    notices: NoticeQueue,
}

impl<A: ComponentsApi> PageEditor<A> {
    pub fn new(api: A, page_key: impl Into<String>) -> Self {
        let page_key = page_key.into();
        let bridge = Arc::new(PreviewBridge::new(page_key.clone()));
        Self::with_bridge(api, page_key, bridge)
    }

    pub fn with_bridge(api: A, page_key: impl Into<String>, bridge: Arc<PreviewBridge>) -> Self {
        Self {
            api,
            page_key: page_key.into(),
            bridge,
            sections: Vec::new(),
            pending: HashMap::new(),
            loading: false,
            saving: HashSet::new(),
            saving_all: false,
            deleting: HashSet::new(),
            duplicating: HashSet::new(),
            generation: 0,
            notices: NoticeQueue::default(),
        }
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn page_key(&self) -> &str {
        &self.page_key
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: i64) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// The single read path for section data: the pending edit if one
    /// exists, else the persisted payload, else an empty object for
    /// unknown ids.
    pub fn live_data(&self, id: i64) -> Value {
        if let Some(pending) = self.pending.get(&id) {
            return pending.clone();
        }
        self.section(id)
            .map(|s| s.component_data.clone())
            .unwrap_or_else(|| Value::Object(Map::new()))
    }

    pub fn is_dirty(&self, id: i64) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self, id: i64) -> bool {
        self.saving.contains(&id)
    }

    pub fn is_saving_all(&self) -> bool {
        self.saving_all
    }

    pub fn is_deleting(&self, id: i64) -> bool {
        self.deleting.contains(&id)
    }

    pub fn is_duplicating(&self, id: i64) -> bool {
        self.duplicating.contains(&id)
    }

    pub fn bridge(&self) -> &Arc<PreviewBridge> {
        &self.bridge
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Fetch all sections for the page (any status, admin view), replace
    /// the local list sorted by order, and clear pending edits.
    /// On failure the prior state is left untouched.
    pub async fn load(&mut self) -> OpResult {
        self.generation += 1;
        let generation = self.generation;
        self.loading = true;

        let result = self.api.list(&self.page_key).await;

        if self.generation != generation {
            // A newer load superseded this fetch; drop the response.
            return OpResult::noop("superseded by a newer load");
        }
        self.loading = false;

        match result {
            Ok(mut sections) => {
                sections.sort_by_key(|s| (s.component_order, s.id));
                self.sections = sections;
                self.pending.clear();
                self.sync_preview();
                OpResult::Applied
            }
            Err(failure) => self.report_failure("Failed to load sections", &failure),
        }
    }

    /// Record a local-only replacement of a section's data. Synchronous,
    /// no network; safe to call on every keystroke.
    pub fn on_field_change(&mut self, id: i64, data: Value) {
        self.pending.insert(id, data);
        self.sync_preview();
    }

    /// Route a form-level change through the registered editor for the
    /// section's type and record the resulting replacement payload.
    pub fn apply_field_change(&mut self, id: i64, change: &FieldChange) -> OpResult {
        let Some(kind) = self.section(id).map(|s| s.component_type.clone()) else {
            return OpResult::noop("unknown section");
        };
        let Some(def) = pagecraft_registry::get(&kind) else {
            self.notices
                .push(Notice::error(format!("No editor available for \"{kind}\"")));
            return OpResult::noop("no editor registered for type");
        };

        let updated = def.editor.update(&self.live_data(id), change);
        self.on_field_change(id, updated);
        OpResult::Applied
    }

    /// Drop the pending entry for `id`, reverting `live_data` to the
    /// persisted payload. No network.
    pub fn discard_changes(&mut self, id: i64) -> OpResult {
        if self.pending.remove(&id).is_none() {
            return OpResult::noop("no unsaved changes");
        }
        self.sync_preview();
        self.notices.push(Notice::info("Changes discarded"));
        OpResult::Applied
    }

    /// Persist the pending edit for one section. On success the pending
    /// data is promoted into the persisted payload; on failure the edit
    /// is preserved.
    pub async fn save_one(&mut self, id: i64) -> OpResult {
        let Some(data) = self.pending.get(&id).cloned() else {
            return OpResult::noop("no unsaved changes");
        };
        if !self.saving.insert(id) {
            return OpResult::noop("save already in flight");
        }

        let result = self.api.update(id, SectionPatch::data(data.clone())).await;
        self.saving.remove(&id);

        match result {
            Ok(_) => {
                self.promote(id, data);
                self.sync_preview();
                self.notices.push(Notice::success("Section saved"));
                OpResult::Applied
            }
            Err(failure) => self.report_failure("Failed to save section", &failure),
        }
    }

    /// Persist every pending edit concurrently and reconcile each entry
    /// independently: successes promote and clear, failures stay pending.
    pub async fn save_all(&mut self) -> SaveAllReport {
        if self.pending.is_empty() {
            self.notices.push(Notice::info("Nothing to save"));
            return SaveAllReport::default();
        }

        self.saving_all = true;
        let snapshot: Vec<(i64, Value)> = self
            .pending
            .iter()
            .map(|(id, data)| (*id, data.clone()))
            .collect();

        let api = &self.api;
        let outcomes = join_all(snapshot.into_iter().map(|(id, data)| async move {
            let result = api.update(id, SectionPatch::data(data.clone())).await;
            (id, data, result)
        }))
        .await;
        self.saving_all = false;

        let mut report = SaveAllReport::default();
        for (id, data, result) in outcomes {
            match result {
                Ok(_) => {
                    self.promote(id, data);
                    report.saved += 1;
                }
                Err(failure) => {
                    tracing::warn!(id, %failure, "save-all entry failed");
                    report.failed += 1;
                }
            }
        }
        self.sync_preview();

        if report.failed == 0 {
            self.notices
                .push(Notice::success(format!("Saved {} section(s)", report.saved)));
        } else {
            self.notices.push(Notice::error(format!(
                "Saved {} section(s), {} failed",
                report.saved, report.failed
            )));
        }
        report
    }

    /// Flip `is_active` immediately. Bypasses pending entirely: this is
    /// not a draft field.
    pub async fn toggle_visibility(&mut self, id: i64) -> OpResult {
        let Some(current) = self.section(id).map(|s| s.is_active) else {
            return OpResult::noop("unknown section");
        };

        match self.api.update(id, SectionPatch::active(!current)).await {
            Ok(_) => {
                if let Some(section) = self.sections.iter_mut().find(|s| s.id == id) {
                    section.is_active = !current;
                }
                self.sync_preview();
                self.notices.push(Notice::success(if current {
                    "Section hidden"
                } else {
                    "Section shown"
                }));
                OpResult::Applied
            }
            Err(failure) => self.report_failure("Failed to toggle visibility", &failure),
        }
    }

    /// Request a server-side copy, then reload the whole page. Id and
    /// order assignment belong to the server; nothing is synthesized
    /// locally.
    pub async fn duplicate(&mut self, id: i64) -> OpResult {
        if self.section(id).is_none() {
            return OpResult::noop("unknown section");
        }
        if !self.duplicating.insert(id) {
            return OpResult::noop("duplicate already in flight");
        }

        let result = self.api.duplicate(id).await;
        self.duplicating.remove(&id);

        match result {
            Ok(_) => {
                self.notices.push(Notice::success("Section duplicated"));
                self.load().await
            }
            Err(failure) => self.report_failure("Failed to duplicate section", &failure),
        }
    }

    /// Delete a section. Irreversible; the caller is expected to have run
    /// a confirm flow first.
    pub async fn delete_section(&mut self, id: i64) -> OpResult {
        if self.section(id).is_none() {
            return OpResult::noop("unknown section");
        }
        if !self.deleting.insert(id) {
            return OpResult::noop("delete already in flight");
        }

        let result = self.api.delete(id).await;
        self.deleting.remove(&id);

        match result {
            Ok(()) => {
                self.sections.retain(|s| s.id != id);
                self.pending.remove(&id);
                self.sync_preview();
                self.notices.push(Notice::success("Section deleted"));
                OpResult::Applied
            }
            Err(failure) => self.report_failure("Failed to delete section", &failure),
        }
    }

    /// Swap the section with its neighbor, renumber the page to a dense
    /// 1..N, apply locally first (zero-latency UI), then persist the full
    /// ordering. A failed persist forces a reload rather than a local
    /// rollback.
    pub async fn move_section(&mut self, id: i64, direction: Direction) -> OpResult {
        let Some(index) = self.sections.iter().position(|s| s.id == id) else {
            return OpResult::noop("unknown section");
        };
        let target = match direction {
            Direction::Up => {
                if index == 0 {
                    return OpResult::noop("already first");
                }
                index - 1
            }
            Direction::Down => {
                if index + 1 == self.sections.len() {
                    return OpResult::noop("already last");
                }
                index + 1
            }
        };

        self.sections.swap(index, target);
        for (position, section) in self.sections.iter_mut().enumerate() {
            section.component_order = (position + 1) as i64;
        }
        self.sync_preview();

        let items: Vec<ReorderItem> = self
            .sections
            .iter()
            .map(|s| ReorderItem {
                id: s.id,
                component_order: s.component_order,
            })
            .collect();

        match self.api.reorder(items).await {
            Ok(()) => OpResult::Applied,
            Err(failure) => {
                let outcome = self.report_failure("Failed to reorder sections", &failure);
                // Resync, not rollback: refetch ground truth.
                self.load().await;
                outcome
            }
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn promote(&mut self, id: i64, data: Value) {
        // The row may have vanished under a concurrent reload; promotion
        // applies only if it still exists.
        if let Some(section) = self.sections.iter_mut().find(|s| s.id == id) {
            section.component_data = data;
        }
        self.pending.remove(&id);
    }

    fn sync_preview(&self) {
        self.bridge.sync(&self.sections, &self.pending);
    }

    fn report_failure(&mut self, context: &str, failure: &ApiFailure) -> OpResult {
        tracing::warn!(context, %failure, "editor operation failed");
        let message = failure.user_message();
        self.notices.push(Notice::error(format!("{context}: {message}")));
        OpResult::Failed { message }
    }
}
