//! # Pagecraft Preview
//!
//! The push channel that keeps an embedded rendering surface current
//! with the editor's merged state. Always full state, never deltas; the
//! receiver treats every message as an authoritative replacement.

mod bridge;
mod message;

pub use bridge::PreviewBridge;
pub use message::{public_components, PreviewComponent, PreviewMessage, MESSAGE_KIND};
