//! API Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use freight_messaging::model::{ConversationType, RecipientCandidate, Role};
use freight_messaging::service::{ConversationView, MessageView};
use freight_messaging::workflow::ConversationStatus;

/// Success envelope: every 2xx response wraps its payload in `data`
#[derive(Debug, Serialize, Deserialize)]
pub struct Data<T> {
    /// Response payload
    pub data: T,
}

impl<T> Data<T> {
    /// Wrap a payload
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Error envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable failure description
    pub message: String,
    /// Per-field validation details, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ErrorBody {
    /// Error body with a bare message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }
}

// ============ Conversations ============

/// Conversation summary as seen by the caller
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConversationDto {
    /// Conversation ID
    pub id: Uuid,
    /// Topic (SUPPORT, BILLING, GENERAL)
    #[serde(rename = "type")]
    #[schema(value_type = String)]
    pub conversation_type: ConversationType,
    /// Subject line
    pub subject: String,
    /// Lifecycle status (OPEN, PENDING, RESOLVED, CLOSED)
    #[schema(value_type = String)]
    pub status: ConversationStatus,
    /// Actor that opened the conversation
    pub creator_id: Uuid,
    /// Explicit recipient, absent for queue-addressed conversations
    pub target_id: Option<Uuid>,
    /// Owning organization
    pub tenant_id: Option<Uuid>,
    /// Timestamp of the latest message
    pub last_message_at: DateTime<Utc>,
    /// Snippet of the latest message
    pub last_message: Option<String>,
    /// Whether the caller has unread messages here
    pub has_unread: bool,
}

impl From<ConversationView> for ConversationDto {
    fn from(view: ConversationView) -> Self {
        Self {
            id: view.id,
            conversation_type: view.conversation_type,
            subject: view.subject,
            status: view.status,
            creator_id: view.creator_id,
            target_id: view.target_id,
            tenant_id: view.tenant_id,
            last_message_at: view.last_message_at,
            last_message: view.last_message,
            has_unread: view.has_unread,
        }
    }
}

/// One ledger entry as seen by the caller
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageDto {
    /// Message ID
    pub id: Uuid,
    /// Author; absent for system messages
    pub author_id: Option<Uuid>,
    /// Author display name
    pub author_name: Option<String>,
    /// Message body, newlines preserved
    pub content: String,
    /// Whether this entry records a status transition
    pub is_system: bool,
    /// Whether the caller authored this entry
    pub is_own: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<MessageView> for MessageDto {
    fn from(view: MessageView) -> Self {
        Self {
            id: view.id,
            author_id: view.author_id,
            author_name: view.author_name,
            content: view.content,
            is_system: view.is_system,
            is_own: view.is_own,
            created_at: view.created_at,
        }
    }
}

/// Conversation plus its full ordered message list
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConversationDetail {
    /// The conversation
    pub conversation: ConversationDto,
    /// All messages, oldest first
    pub messages: Vec<MessageDto>,
}

/// Conversation creation request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateConversationRequest {
    /// Topic; required for client/user callers, ignored for directed roles
    #[serde(rename = "type")]
    #[schema(value_type = Option<String>)]
    pub conversation_type: Option<ConversationType>,
    /// Subject line
    pub subject: String,
    /// Initial message body
    pub message: String,
    /// Explicit recipient; required for directed roles, ignored otherwise
    pub target_user_id: Option<Uuid>,
}

/// Message creation request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PostMessageRequest {
    /// Message body
    pub content: String,
}

/// Status change request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChangeStatusRequest {
    /// Requested status (RESOLVED or CLOSED)
    #[schema(value_type = String)]
    pub status: ConversationStatus,
}

// ============ Users ============

/// Addressable recipient
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecipientDto {
    /// Actor ID
    pub id: Uuid,
    /// Email address
    pub email: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Platform role
    #[schema(value_type = String)]
    pub role: Role,
}

impl From<RecipientCandidate> for RecipientDto {
    fn from(c: RecipientCandidate) -> Self {
        Self {
            id: c.id,
            email: c.email,
            first_name: c.first_name,
            last_name: c.last_name,
            role: c.role,
        }
    }
}
