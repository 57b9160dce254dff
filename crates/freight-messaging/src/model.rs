//! Messaging Data Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::MessagingError;
use crate::workflow::ConversationStatus;

/// Actor ID
pub type ActorId = Uuid;
/// Tenant ID
pub type TenantId = Uuid;
/// Conversation ID
pub type ConversationId = Uuid;
/// Message ID
pub type MessageId = Uuid;

/// Maximum length of the denormalized last-message snippet, in characters.
pub const SNIPPET_LEN: usize = 120;

/// Platform role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Platform super-administrator; sees all tenants
    Root,
    /// Organization administrator
    Admin,
    /// Organization manager
    Manager,
    /// End client of an organization
    Client,
    /// Default role for plain platform users
    User,
}

impl Role {
    /// Whether this role may select an explicit recipient when opening a
    /// conversation. Non-directed roles address their tenant's support queue.
    pub fn is_directed(&self) -> bool {
        matches!(self, Role::Root | Role::Admin | Role::Manager)
    }
}

impl FromStr for Role {
    type Err = MessagingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "root" => Ok(Role::Root),
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "client" => Ok(Role::Client),
            "user" => Ok(Role::User),
            other => Err(MessagingError::InvalidRole(other.to_string())),
        }
    }
}

/// Caller identity, supplied by the Identity Provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Unique actor ID
    pub id: ActorId,
    /// Platform role
    pub role: Role,
    /// Owning organization; `None` only for the platform root
    pub tenant_id: Option<TenantId>,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address
    pub email: String,
}

impl Actor {
    /// Display name shown next to authored messages
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Conversation topic, meaningful for queue-addressed conversations
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConversationType {
    /// Support request
    Support,
    /// Billing question
    Billing,
    /// Anything else; default for directed conversations
    #[default]
    General,
}

/// A threaded exchange between two sides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: ConversationId,
    /// Topic
    pub conversation_type: ConversationType,
    /// Subject line (non-empty)
    pub subject: String,
    /// Lifecycle status
    pub status: ConversationStatus,
    /// Actor that opened the conversation
    pub creator_id: ActorId,
    /// Explicitly addressed recipient; `None` for queue-addressed
    /// conversations, answerable by any staff member of the tenant
    pub target_id: Option<ActorId>,
    /// Organization the conversation belongs to; `None` only for
    /// platform-level exchanges between tenant-less actors
    pub tenant_id: Option<TenantId>,
    /// Timestamp of the latest ledger entry
    pub last_message_at: DateTime<Utc>,
    /// Denormalized snippet of the latest ledger entry
    pub last_message: Option<String>,
    /// Author of the latest ledger entry; `None` for system messages
    pub last_author_id: Option<ActorId>,
    /// Sequence number of the latest ledger entry
    pub last_seq: u64,
    /// Per-participant read markers, as ledger sequence numbers
    pub last_read: HashMap<ActorId, u64>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Whether the viewer has ledger entries newer than their read marker.
    /// A viewer never has unread state for their own latest message.
    pub fn has_unread(&self, viewer: ActorId) -> bool {
        if self.last_author_id == Some(viewer) {
            return false;
        }
        if self.last_seq == 0 {
            return false;
        }
        self.last_read.get(&viewer).copied().unwrap_or(0) < self.last_seq
    }
}

/// A single immutable ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: MessageId,
    /// Owning conversation
    pub conversation_id: ConversationId,
    /// Author; `None` for system-generated messages
    pub author_id: Option<ActorId>,
    /// Free text, newlines preserved (non-empty)
    pub content: String,
    /// Whether this entry records a status transition
    pub is_system: bool,
    /// Position within the conversation, starting at 1
    pub seq: u64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Addressable user, projected from the User Directory per search request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipientCandidate {
    /// Actor ID
    pub id: ActorId,
    /// Email address
    pub email: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Platform role
    pub role: Role,
}

impl From<&Actor> for RecipientCandidate {
    fn from(actor: &Actor) -> Self {
        Self {
            id: actor.id,
            email: actor.email.clone(),
            first_name: actor.first_name.clone(),
            last_name: actor.last_name.clone(),
            role: actor.role,
        }
    }
}

/// Truncate message content to the denormalized snippet length.
pub(crate) fn snippet(content: &str) -> String {
    content.chars().take(SNIPPET_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directed_roles() {
        assert!(Role::Root.is_directed());
        assert!(Role::Admin.is_directed());
        assert!(Role::Manager.is_directed());
        assert!(!Role::Client.is_directed());
        assert!(!Role::User.is_directed());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!(matches!(
            "superuser".parse::<Role>(),
            Err(MessagingError::InvalidRole(r)) if r == "superuser"
        ));
    }

    #[test]
    fn test_snippet_truncation() {
        let long = "x".repeat(500);
        assert_eq!(snippet(&long).chars().count(), SNIPPET_LEN);
        assert_eq!(snippet("hola\nmundo"), "hola\nmundo");
    }
}
