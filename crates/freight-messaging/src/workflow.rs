//! Status Workflow
//!
//! State machine governing the conversation lifecycle:
//!
//! ```text
//! OPEN ──────┐
//!            ├──► RESOLVED ──► CLOSED (terminal)
//! PENDING ───┘
//! ```
//!
//! Nothing returns from RESOLVED or CLOSED through this interface. PENDING
//! is reserved vocabulary: it appears in the status set but no caller-facing
//! action sets it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MessagingError, MessagingResult};
use crate::model::ConversationId;

/// Conversation lifecycle status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConversationStatus {
    /// Initial state on creation
    #[default]
    Open,
    /// Reserved: awaiting a reply (no caller-facing trigger)
    Pending,
    /// Marked resolved by a participant
    Resolved,
    /// Terminal soft-archived state; accepts no further mutations
    Closed,
}

impl ConversationStatus {
    /// Whether the conversation accepts no further mutations
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConversationStatus::Closed)
    }
}

impl fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConversationStatus::Open => "OPEN",
            ConversationStatus::Pending => "PENDING",
            ConversationStatus::Resolved => "RESOLVED",
            ConversationStatus::Closed => "CLOSED",
        };
        f.write_str(s)
    }
}

/// Validate a caller-requested transition against the workflow.
///
/// Allowed: OPEN|PENDING → RESOLVED, RESOLVED → CLOSED. A CLOSED
/// conversation rejects everything with [`MessagingError::ConversationClosed`];
/// any other pair fails [`MessagingError::InvalidTransition`] naming the
/// attempted and current state.
pub fn validate_transition(
    conversation_id: ConversationId,
    current: ConversationStatus,
    requested: ConversationStatus,
) -> MessagingResult<()> {
    use ConversationStatus::*;

    if current.is_terminal() {
        return Err(MessagingError::ConversationClosed(conversation_id));
    }

    match (current, requested) {
        (Open | Pending, Resolved) => Ok(()),
        (Resolved, Closed) => Ok(()),
        (from, to) => Err(MessagingError::InvalidTransition { from, to }),
    }
}

/// Content of the system message recording a transition.
pub fn transition_note(status: ConversationStatus) -> String {
    format!("Conversation marked {status}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use ConversationStatus::*;

    #[test]
    fn test_allowed_transitions() {
        let id = Uuid::new_v4();
        assert!(validate_transition(id, Open, Resolved).is_ok());
        assert!(validate_transition(id, Pending, Resolved).is_ok());
        assert!(validate_transition(id, Resolved, Closed).is_ok());
    }

    #[test]
    fn test_no_way_back() {
        let id = Uuid::new_v4();
        assert!(matches!(
            validate_transition(id, Resolved, Open),
            Err(MessagingError::InvalidTransition { from: Resolved, to: Open })
        ));
        assert!(matches!(
            validate_transition(id, Resolved, Pending),
            Err(MessagingError::InvalidTransition { .. })
        ));
        assert!(matches!(
            validate_transition(id, Open, Closed),
            Err(MessagingError::InvalidTransition { from: Open, to: Closed })
        ));
    }

    #[test]
    fn test_closed_is_terminal() {
        let id = Uuid::new_v4();
        for requested in [Open, Pending, Resolved, Closed] {
            assert!(matches!(
                validate_transition(id, Closed, requested),
                Err(MessagingError::ConversationClosed(c)) if c == id
            ));
        }
    }

    #[test]
    fn test_self_transitions_rejected() {
        let id = Uuid::new_v4();
        assert!(validate_transition(id, Open, Open).is_err());
        assert!(validate_transition(id, Resolved, Resolved).is_err());
    }

    #[test]
    fn test_wire_spelling_is_uppercase() {
        assert_eq!(serde_json::to_string(&Resolved).unwrap(), "\"RESOLVED\"");
        assert_eq!(serde_json::from_str::<ConversationStatus>("\"CLOSED\"").unwrap(), Closed);
    }
}
