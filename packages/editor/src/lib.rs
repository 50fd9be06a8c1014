//! # Pagecraft Editor
//!
//! The page editor state machine and the view state that sits on top of
//! it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ views: list/rows, per-type forms             │
//! └──────────────────────────────────────────────┘
//!                      ↓ intents
//! ┌──────────────────────────────────────────────┐
//! │ editor: PageEditor state machine             │
//! │  - sections + pending edits (sole owner)     │
//! │  - load / save / toggle / duplicate / delete │
//! │  - optimistic reorder, resync on failure     │
//! └──────────────────────────────────────────────┘
//!         ↓ network                 ↓ push
//! ┌───────────────────┐  ┌─────────────────────────┐
//! │ api: REST client  │  │ preview: bridge channel │
//! └───────────────────┘  └─────────────────────────┘
//! ```

mod list;
mod notify;
mod state;

pub use list::ListController;
pub use notify::NoticeQueue;
pub use state::{Direction, OpResult, PageEditor, SaveAllReport};
