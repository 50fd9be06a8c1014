//! # Pagecraft API Client
//!
//! Transport layer between the page editor and the admin backend: the
//! [`ComponentsApi`] trait (one method per endpoint), its hyper-backed
//! implementation, and the two-way failure taxonomy the state machine
//! relies on (`success: false` vs. transport error).

mod client;
mod contract;
mod error;

pub use client::HttpComponentsApi;
pub use contract::{ComponentsApi, SectionPatch};
pub use error::ApiFailure;
