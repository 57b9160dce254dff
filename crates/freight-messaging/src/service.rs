//! Conversation Service
//!
//! Thin orchestrator exposing the engine as the caller-facing contract.
//! Resolves the caller's scope once per request and threads it through;
//! holds no state of its own beyond handles to the store, the ledger and
//! the directories. Failures are logged with the failing operation and
//! conversation id, then returned unchanged.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::directory::{RecipientDirectory, UserDirectory};
use crate::error::{MessagingError, MessagingResult};
use crate::ledger::MessageLedger;
use crate::model::{
    Actor, ActorId, Conversation, ConversationId, ConversationType, Message, MessageId,
    RecipientCandidate, TenantId,
};
use crate::scope::Scope;
use crate::store::ConversationStore;
use crate::workflow::ConversationStatus;

/// Conversation summary as seen by one viewer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationView {
    /// Conversation ID
    pub id: ConversationId,
    /// Topic
    pub conversation_type: ConversationType,
    /// Subject line
    pub subject: String,
    /// Lifecycle status
    pub status: ConversationStatus,
    /// Actor that opened the conversation
    pub creator_id: ActorId,
    /// Explicit recipient, if any
    pub target_id: Option<ActorId>,
    /// Owning organization
    pub tenant_id: Option<TenantId>,
    /// Timestamp of the latest entry
    pub last_message_at: DateTime<Utc>,
    /// Snippet of the latest entry
    pub last_message: Option<String>,
    /// Whether the viewer has entries newer than their read marker
    pub has_unread: bool,
}

impl ConversationView {
    fn project(conv: &Conversation, viewer: ActorId) -> Self {
        Self {
            id: conv.id,
            conversation_type: conv.conversation_type,
            subject: conv.subject.clone(),
            status: conv.status,
            creator_id: conv.creator_id,
            target_id: conv.target_id,
            tenant_id: conv.tenant_id,
            last_message_at: conv.last_message_at,
            last_message: conv.last_message.clone(),
            has_unread: conv.has_unread(viewer),
        }
    }
}

/// Ledger entry as seen by one viewer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageView {
    /// Message ID
    pub id: MessageId,
    /// Author, `None` for system messages
    pub author_id: Option<ActorId>,
    /// Author display name resolved from the directory
    pub author_name: Option<String>,
    /// Message body
    pub content: String,
    /// Whether this entry records a status transition
    pub is_system: bool,
    /// Whether the viewer authored this entry
    pub is_own: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Input for opening a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewConversation {
    /// Topic; required for non-directed creators, ignored for directed ones
    pub conversation_type: Option<ConversationType>,
    /// Subject line
    pub subject: String,
    /// Initial message body
    pub message: String,
    /// Explicit recipient; required for directed creators, ignored otherwise
    pub target_user_id: Option<ActorId>,
}

/// Caller-facing orchestrator over the messaging engine
#[derive(Clone)]
pub struct ConversationService {
    store: ConversationStore,
    ledger: MessageLedger,
    recipients: RecipientDirectory,
    directory: Arc<dyn UserDirectory>,
}

impl ConversationService {
    /// Build a service over the given User Directory with a fresh store
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        let store = ConversationStore::new();
        let ledger = store.ledger();
        Self {
            store,
            ledger,
            recipients: RecipientDirectory::new(Arc::clone(&directory)),
            directory,
        }
    }

    /// List the caller's conversations, newest activity first
    pub fn list_conversations(
        &self,
        actor: &Actor,
        search: Option<&str>,
    ) -> MessagingResult<Vec<ConversationView>> {
        let scope = Scope::resolve(actor)?;
        let conversations = self.store.list(&scope, actor.id, search);
        Ok(conversations
            .iter()
            .map(|c| ConversationView::project(c, actor.id))
            .collect())
    }

    /// Fetch one conversation plus its full ordered message list.
    /// Reading clears the caller's unread state.
    pub fn get_conversation(
        &self,
        actor: &Actor,
        id: ConversationId,
    ) -> MessagingResult<(ConversationView, Vec<MessageView>)> {
        let scope = Scope::resolve(actor)?;
        self.store
            .get(&scope, actor.id, id)
            .inspect_err(|e| Self::log_failure("get_conversation", Some(id), e))?;

        let messages = self.ledger.list(id, actor.id)?;
        let views = messages
            .into_iter()
            .map(|m| self.message_view(m, actor.id))
            .collect::<MessagingResult<Vec<_>>>()?;

        // Re-read after the read marker advanced, so has_unread is current.
        let conversation = self.store.get(&scope, actor.id, id)?;
        Ok((ConversationView::project(&conversation, actor.id), views))
    }

    /// Open a conversation with its mandatory first message.
    ///
    /// Directed callers (root, admin, manager) must name a recipient that
    /// resolves under their scope; non-directed callers must pick a type,
    /// and any supplied recipient is ignored; their conversation addresses
    /// the tenant's support queue.
    pub fn create_conversation(
        &self,
        actor: &Actor,
        input: NewConversation,
    ) -> MessagingResult<ConversationView> {
        if input.subject.trim().is_empty() {
            return Err(MessagingError::Validation("subject must not be empty".into()));
        }
        if input.message.trim().is_empty() {
            return Err(MessagingError::Validation("message must not be empty".into()));
        }

        let scope = Scope::resolve(actor)?;

        let (conversation_type, target) = if actor.role.is_directed() {
            let target_id = input.target_user_id.ok_or_else(|| {
                MessagingError::Validation("a recipient is required for this role".into())
            })?;
            let target = self.resolve_target(&scope, target_id)?;
            (input.conversation_type.unwrap_or_default(), Some(target))
        } else {
            let conversation_type = input.conversation_type.ok_or_else(|| {
                MessagingError::Validation("conversation type is required".into())
            })?;
            (conversation_type, None)
        };

        let conversation = self
            .store
            .create(actor, conversation_type, &input.subject, &input.message, target.as_ref())
            .inspect_err(|e| Self::log_failure("create_conversation", None, e))?;

        Ok(ConversationView::project(&conversation, actor.id))
    }

    /// Append a message to a conversation the caller participates in
    pub fn send_message(
        &self,
        actor: &Actor,
        id: ConversationId,
        content: &str,
    ) -> MessagingResult<MessageView> {
        let scope = Scope::resolve(actor)?;
        let message = self
            .ledger
            .append(id, actor, &scope, content)
            .inspect_err(|e| Self::log_failure("send_message", Some(id), e))?;
        self.message_view(message, actor.id)
    }

    /// Apply a status transition on behalf of the caller
    pub fn change_status(
        &self,
        actor: &Actor,
        id: ConversationId,
        status: ConversationStatus,
    ) -> MessagingResult<ConversationView> {
        let scope = Scope::resolve(actor)?;
        let conversation = self
            .store
            .transition(&scope, actor, id, status)
            .inspect_err(|e| Self::log_failure("change_status", Some(id), e))?;
        Ok(ConversationView::project(&conversation, actor.id))
    }

    /// Search for addressable recipients under the caller's scope
    pub fn search_recipients(
        &self,
        actor: &Actor,
        query: &str,
    ) -> MessagingResult<Vec<RecipientCandidate>> {
        let scope = Scope::resolve(actor)?;
        self.recipients.search_recipients(&scope, query, actor.id)
    }

    /// Number of stored conversations, for operational reporting
    pub fn conversation_count(&self) -> usize {
        self.store.count()
    }

    fn resolve_target(&self, scope: &Scope, target_id: ActorId) -> MessagingResult<Actor> {
        let target = self.directory.find(target_id)?.ok_or(MessagingError::NotFound {
            entity: "recipient",
            id: target_id.to_string(),
        })?;
        if !scope.covers(target.tenant_id) {
            return Err(MessagingError::NotFound {
                entity: "recipient",
                id: target_id.to_string(),
            });
        }
        Ok(target)
    }

    fn message_view(&self, message: Message, viewer: ActorId) -> MessagingResult<MessageView> {
        let author_name = match message.author_id {
            Some(author_id) => self.directory.find(author_id)?.map(|a| a.display_name()),
            None => None,
        };
        Ok(MessageView {
            id: message.id,
            author_id: message.author_id,
            author_name,
            is_own: message.author_id == Some(viewer),
            content: message.content,
            is_system: message.is_system,
            created_at: message.created_at,
        })
    }

    fn log_failure(operation: &'static str, id: Option<ConversationId>, error: &MessagingError) {
        match id {
            Some(id) => {
                tracing::warn!(operation, conversation = %id, error = %error, "operation failed")
            }
            None => tracing::warn!(operation, error = %error, "operation failed"),
        }
    }
}
