//! Error types for the messaging engine

use crate::model::ConversationId;
use crate::workflow::ConversationStatus;
use thiserror::Error;

/// Messaging engine error type
#[derive(Error, Debug)]
pub enum MessagingError {
    /// Missing or malformed input; caller must correct and retry
    #[error("validation error: {0}")]
    Validation(String),

    /// Scope violation; never retried
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Unknown conversation or recipient
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind ("conversation", "recipient", ...)
        entity: &'static str,
        /// Identifier that failed to resolve
        id: String,
    },

    /// Mutation attempted on a terminal conversation
    #[error("conversation {0} is closed")]
    ConversationClosed(ConversationId),

    /// Status change violates the workflow
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status
        from: ConversationStatus,
        /// Requested status
        to: ConversationStatus,
    },

    /// Role string not part of the platform vocabulary
    #[error("unrecognized role: {0}")]
    InvalidRole(String),

    /// Dependency timeout or unavailability; safe to retry with backoff
    #[error("transient dependency failure: {0}")]
    Transient(String),
}

/// Result type for the messaging engine
pub type MessagingResult<T> = Result<T, MessagingError>;
