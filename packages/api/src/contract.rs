//! # Page Components API Contract
//!
//! One trait method per backend endpoint. The state machine depends only
//! on [`ComponentsApi`], so tests substitute a scripted mock and the
//! studio wires in the hyper-backed client.

use async_trait::async_trait;
use pagecraft_common::{ApiEnvelope, ReorderItem, Section, SectionStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ApiFailure;

/// Partial-update body for `PUT /page-components/admin/{id}`. Unset
/// fields are omitted from the wire entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SectionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_data: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SectionStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_order: Option<i64>,
}

impl SectionPatch {
    pub fn data(value: Value) -> Self {
        Self {
            component_data: Some(value),
            ..Self::default()
        }
    }

    pub fn active(flag: bool) -> Self {
        Self {
            is_active: Some(flag),
            ..Self::default()
        }
    }
}

#[async_trait]
pub trait ComponentsApi: Send + Sync {
    /// `GET /page-components/admin?page_key={key}` — all sections for the
    /// page, any status (admin view).
    async fn list(&self, page_key: &str) -> Result<Vec<Section>, ApiFailure>;

    /// `PUT /page-components/admin/{id}` — partial update.
    async fn update(&self, id: i64, patch: SectionPatch) -> Result<Section, ApiFailure>;

    /// `POST /page-components/admin/{id}/duplicate` — server-side copy.
    async fn duplicate(&self, id: i64) -> Result<Section, ApiFailure>;

    /// `DELETE /page-components/admin/{id}`.
    async fn delete(&self, id: i64) -> Result<(), ApiFailure>;

    /// `POST /page-components/admin/reorder` — complete replacement set of
    /// (id, order) pairs for the page.
    async fn reorder(&self, items: Vec<ReorderItem>) -> Result<(), ApiFailure>;
}

/// Fold an envelope whose payload is required into the client result.
pub(crate) fn require_data<T>(envelope: ApiEnvelope<T>) -> Result<T, ApiFailure> {
    if !envelope.success {
        return Err(ApiFailure::App {
            message: envelope.message,
        });
    }
    envelope.data.ok_or_else(|| ApiFailure::Transport {
        detail: "response envelope missing data".to_string(),
    })
}

/// Fold an envelope whose payload is irrelevant (`data: null` endpoints).
pub(crate) fn require_ok<T>(envelope: ApiEnvelope<T>) -> Result<(), ApiFailure> {
    if envelope.success {
        Ok(())
    } else {
        Err(ApiFailure::App {
            message: envelope.message,
        })
    }
}
