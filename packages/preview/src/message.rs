//! Wire contract between the bridge and the embedded rendering surface.
//!
//! Every message is a full authoritative replacement of the surface's
//! rendered content, keyed by `id` and ordered by `order` — never a
//! delta, so the surface needs no merge logic. The `kind` tag lets the
//! surface distinguish these pushes from unrelated traffic on the same
//! channel.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message tag for section-list pushes.
pub const MESSAGE_KIND: &str = "page-components-sync";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviewMessage {
    pub kind: String,
    pub page_key: String,
    pub components: Vec<PreviewComponent>,
    pub timestamp: i64,
}

/// One flattened section as the surface consumes it: merged data
/// (pending edit wins over persisted), order rank and visibility flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviewComponent {
    pub id: i64,

    #[serde(rename = "type")]
    pub kind: String,

    pub data: Value,
    pub order: i64,
    pub active: bool,
}

/// The public-facing render path skips inactive entries; the editor-fed
/// admin preview shows everything. That filtering belongs to the surface,
/// not the bridge — this helper documents the rule and backs its tests.
pub fn public_components(components: &[PreviewComponent]) -> Vec<&PreviewComponent> {
    components.iter().filter(|c| c.active).collect()
}
