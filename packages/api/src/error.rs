//! Failure taxonomy for the admin REST client.
//!
//! Two distinct paths: the backend answered with `success: false`
//! (application failure, message is user-visible, never retried), or the
//! request never produced a structured envelope at all (transport
//! failure, surfaced with a generic message).

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiFailure {
    /// Backend processed the request and rejected it.
    #[error("{message}")]
    App { message: String },

    /// Network error, non-2xx with no parseable body, or malformed body.
    #[error("transport failure: {detail}")]
    Transport { detail: String },
}

impl ApiFailure {
    pub fn transport(detail: impl std::fmt::Display) -> Self {
        Self::Transport {
            detail: detail.to_string(),
        }
    }

    pub fn is_app(&self) -> bool {
        matches!(self, Self::App { .. })
    }

    /// What the admin UI shows. Application messages pass through;
    /// transport details collapse to a generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            Self::App { message } => message.clone(),
            Self::Transport { .. } => "The server could not be reached. Please try again.".to_string(),
        }
    }
}
