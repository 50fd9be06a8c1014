//! Outcome reporting.
//!
//! Operations never throw past their boundary; they queue a [`Notice`]
//! here and the host surfaces it (toast, log line, whatever the UI
//! does). Queued notices are drained by the host, oldest first.

use std::collections::VecDeque;

use pagecraft_common::{Notice, NoticeLevel};

#[derive(Debug, Default)]
pub struct NoticeQueue {
    items: VecDeque<Notice>,
}

impl NoticeQueue {
    pub fn push(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => tracing::warn!(message = %notice.message, "notice"),
            _ => tracing::info!(message = %notice.message, "notice"),
        }
        self.items.push_back(notice);
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        self.items.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
