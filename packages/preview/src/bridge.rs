//! # Preview Bridge
//!
//! One-way push channel keeping the embedded rendering surface in sync
//! with the editor's merged state (persisted + pending). The surface
//! never calls back into the editor's network layer; it renders whatever
//! the latest message says. Late subscribers replay the current snapshot
//! immediately, which also covers the "surface finished its initial
//! load" re-send.

use std::collections::HashMap;
use std::sync::Mutex;

use pagecraft_common::Section;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::message::{PreviewComponent, PreviewMessage, MESSAGE_KIND};

pub struct PreviewBridge {
    page_key: String,
    sender: broadcast::Sender<PreviewMessage>,
    latest: Mutex<Option<PreviewMessage>>,
}

impl PreviewBridge {
    pub fn new(page_key: impl Into<String>) -> Self {
        let (sender, _) = broadcast::channel(64);
        Self {
            page_key: page_key.into(),
            sender,
            latest: Mutex::new(None),
        }
    }

    /// Recompute the merged section list and push it. Total replacement:
    /// re-sending the same state is observably idempotent for the
    /// surface. Returns the message for callers that want to inspect it.
    pub fn sync(&self, sections: &[Section], pending: &HashMap<i64, Value>) -> PreviewMessage {
        let message = self.compose(sections, pending);
        *self.latest.lock().unwrap() = Some(message.clone());
        // No receiver connected is not an error; the snapshot replays on
        // the next subscribe.
        let receivers = self.sender.send(message.clone()).unwrap_or(0);
        tracing::debug!(
            page_key = %self.page_key,
            components = message.components.len(),
            receivers,
            "preview sync"
        );
        message
    }

    /// Latest snapshot plus a live receiver. The snapshot comes first so
    /// a surface that just finished loading renders without waiting for
    /// the next editor change.
    pub fn subscribe(&self) -> (Option<PreviewMessage>, broadcast::Receiver<PreviewMessage>) {
        let receiver = self.sender.subscribe();
        let snapshot = self.latest.lock().unwrap().clone();
        (snapshot, receiver)
    }

    pub fn latest(&self) -> Option<PreviewMessage> {
        self.latest.lock().unwrap().clone()
    }

    pub fn page_key(&self) -> &str {
        &self.page_key
    }

    fn compose(&self, sections: &[Section], pending: &HashMap<i64, Value>) -> PreviewMessage {
        let mut components: Vec<PreviewComponent> = sections
            .iter()
            .map(|section| PreviewComponent {
                id: section.id,
                kind: section.component_type.clone(),
                data: pending
                    .get(&section.id)
                    .cloned()
                    .unwrap_or_else(|| section.component_data.clone()),
                order: section.component_order,
                active: section.is_active,
            })
            .collect();
        components.sort_by_key(|c| (c.order, c.id));

        PreviewMessage {
            kind: MESSAGE_KIND.to_string(),
            page_key: self.page_key.clone(),
            components,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}
