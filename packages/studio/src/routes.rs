//! HTTP surface for the admin UI and the embedded preview.
//!
//! Every mutating route forwards one intent to the state machine and
//! returns its settled outcome as JSON; the preview route streams bridge
//! messages as server-sent events. Nothing here owns state beyond the
//! shared handle.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::stream::{self, Stream, StreamExt};
use pagecraft_api::HttpComponentsApi;
use pagecraft_common::{Notice, SectionStatus};
use pagecraft_editor::{Direction, ListController, OpResult, PageEditor, SaveAllReport};
use pagecraft_preview::{PreviewBridge, PreviewMessage, MESSAGE_KIND};
use pagecraft_registry::{FieldChange, Form};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

/// Editor plus its list view state, guarded as one unit so prune always
/// sees the section list it belongs to.
pub struct Studio {
    pub editor: PageEditor<HttpComponentsApi>,
    pub list: ListController,
}

pub struct AppState {
    pub studio: Mutex<Studio>,
    pub bridge: Arc<PreviewBridge>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/sections", get(list_sections))
        .route("/api/registry", get(registry_catalogue))
        .route("/api/notices", get(drain_notices))
        .route("/api/preview", get(preview_sse))
        .route("/api/reload", post(reload))
        .route("/api/save-all", post(save_all))
        .route("/api/sections/:id/field", post(apply_field_change))
        .route("/api/sections/:id/discard", post(discard_changes))
        .route("/api/sections/:id/save", post(save_one))
        .route("/api/sections/:id/toggle", post(toggle_visibility))
        .route("/api/sections/:id/duplicate", post(duplicate))
        .route("/api/sections/:id/move", post(move_section))
        .route("/api/sections/:id/expand", post(toggle_expanded))
        .route("/api/sections/:id/delete", post(request_delete))
        .route("/api/delete/confirm", post(confirm_delete))
        .route("/api/delete/cancel", post(cancel_delete))
        .with_state(state)
}

// ----------------------------------------------------------------------
// Reads
// ----------------------------------------------------------------------

#[derive(Serialize)]
struct SectionRow {
    id: i64,
    name: String,
    kind: String,
    label: String,
    icon: &'static str,
    order: i64,
    active: bool,
    status: SectionStatus,
    dirty: bool,
    has_editor: bool,
    expanded: bool,
    confirming_delete: bool,
    saving: bool,
    deleting: bool,
    duplicating: bool,
    /// Rendered form for the expanded row; absent while collapsed or
    /// when no editor is registered for the type.
    #[serde(skip_serializing_if = "Option::is_none")]
    form: Option<Form>,
}

#[derive(Serialize)]
struct SectionListResponse {
    page_key: String,
    loading: bool,
    saving_all: bool,
    pending_count: usize,
    rows: Vec<SectionRow>,
}

async fn list_sections(State(state): State<Arc<AppState>>) -> Json<SectionListResponse> {
    let studio = state.studio.lock().await;
    let editor = &studio.editor;
    let list = &studio.list;

    let rows = editor
        .sections()
        .iter()
        .map(|section| {
            let def = pagecraft_registry::get(&section.component_type);
            let expanded = list.is_expanded(section.id);
            let form = match (expanded, def) {
                (true, Some(def)) => Some(def.editor.form(&editor.live_data(section.id))),
                _ => None,
            };
            SectionRow {
                id: section.id,
                name: section.component_name.clone(),
                kind: section.component_type.clone(),
                label: pagecraft_registry::label_for(&section.component_type),
                icon: pagecraft_registry::icon_for(&section.component_type),
                order: section.component_order,
                active: section.is_active,
                status: section.status,
                dirty: editor.is_dirty(section.id),
                has_editor: def.is_some(),
                expanded,
                confirming_delete: list.confirming_delete() == Some(section.id),
                saving: editor.is_saving(section.id),
                deleting: editor.is_deleting(section.id),
                duplicating: editor.is_duplicating(section.id),
                form,
            }
        })
        .collect();

    Json(SectionListResponse {
        page_key: editor.page_key().to_string(),
        loading: editor.is_loading(),
        saving_all: editor.is_saving_all(),
        pending_count: editor.pending_count(),
        rows,
    })
}

#[derive(Serialize)]
struct RegistryEntry {
    kind: &'static str,
    label: &'static str,
    icon: &'static str,
    default_data: Value,
}

async fn registry_catalogue() -> Json<Vec<RegistryEntry>> {
    let entries = pagecraft_registry::all()
        .iter()
        .map(|def| RegistryEntry {
            kind: def.kind,
            label: def.label,
            icon: def.icon,
            default_data: (def.default_data)(),
        })
        .collect();
    Json(entries)
}

async fn drain_notices(State(state): State<Arc<AppState>>) -> Json<Vec<Notice>> {
    let mut studio = state.studio.lock().await;
    Json(studio.editor.drain_notices())
}

// ----------------------------------------------------------------------
// Preview stream
// ----------------------------------------------------------------------

async fn preview_sse(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (snapshot, receiver) = state.bridge.subscribe();
    tracing::info!(page_key = %state.bridge.page_key(), "preview surface connected");

    // Snapshot first so a surface that just finished loading renders
    // without waiting for the next editor change.
    let initial = stream::iter(
        snapshot
            .into_iter()
            .map(|message| Ok::<_, Infallible>(sse_event(&message))),
    );

    let live = BroadcastStream::new(receiver).filter_map(|received| async move {
        match received {
            Ok(message) => Some(Ok(sse_event(&message))),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                // Dropped pushes are harmless: the next message is a full
                // replacement anyway.
                tracing::warn!(skipped, "preview subscriber lagged");
                None
            }
        }
    });

    Sse::new(initial.chain(live)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn sse_event(message: &PreviewMessage) -> Event {
    Event::default()
        .event(MESSAGE_KIND)
        .data(serde_json::to_string(message).unwrap_or_default())
}

// ----------------------------------------------------------------------
// Mutations
// ----------------------------------------------------------------------

async fn reload(State(state): State<Arc<AppState>>) -> Json<OpResult> {
    let mut studio = state.studio.lock().await;
    let studio = &mut *studio;
    let outcome = studio.editor.load().await;
    studio.list.prune(studio.editor.sections());
    Json(outcome)
}

async fn save_all(State(state): State<Arc<AppState>>) -> Json<SaveAllReport> {
    let mut studio = state.studio.lock().await;
    Json(studio.editor.save_all().await)
}

async fn apply_field_change(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(change): Json<FieldChange>,
) -> Json<OpResult> {
    let mut studio = state.studio.lock().await;
    Json(studio.editor.apply_field_change(id, &change))
}

async fn discard_changes(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Json<OpResult> {
    let mut studio = state.studio.lock().await;
    Json(studio.editor.discard_changes(id))
}

async fn save_one(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Json<OpResult> {
    let mut studio = state.studio.lock().await;
    Json(studio.editor.save_one(id).await)
}

async fn toggle_visibility(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Json<OpResult> {
    let mut studio = state.studio.lock().await;
    Json(studio.editor.toggle_visibility(id).await)
}

async fn duplicate(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Json<OpResult> {
    let mut studio = state.studio.lock().await;
    let studio = &mut *studio;
    let outcome = studio.editor.duplicate(id).await;
    studio.list.prune(studio.editor.sections());
    Json(outcome)
}

#[derive(Deserialize)]
struct MoveBody {
    direction: Direction,
}

async fn move_section(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<MoveBody>,
) -> Json<OpResult> {
    let mut studio = state.studio.lock().await;
    Json(studio.editor.move_section(id, body.direction).await)
}

async fn toggle_expanded(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Json<OpResult> {
    let mut studio = state.studio.lock().await;
    studio.list.toggle_expanded(id);
    Json(OpResult::Applied)
}

async fn request_delete(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Json<OpResult> {
    let mut studio = state.studio.lock().await;
    if studio.editor.section(id).is_none() {
        return Json(OpResult::Noop {
            reason: "unknown section".to_string(),
        });
    }
    studio.list.request_delete(id);
    Json(OpResult::Applied)
}

async fn confirm_delete(State(state): State<Arc<AppState>>) -> Json<OpResult> {
    let mut studio = state.studio.lock().await;
    let studio = &mut *studio;
    let Some(id) = studio.list.confirm_delete() else {
        return Json(OpResult::Noop {
            reason: "no delete awaiting confirmation".to_string(),
        });
    };
    let outcome = studio.editor.delete_section(id).await;
    studio.list.prune(studio.editor.sections());
    Json(outcome)
}

async fn cancel_delete(State(state): State<Arc<AppState>>) -> Json<OpResult> {
    let mut studio = state.studio.lock().await;
    studio.list.cancel_delete();
    Json(OpResult::Applied)
}
