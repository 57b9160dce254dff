//! Conversation Store
//!
//! Holds conversation records and enforces creation, visibility and
//! lifecycle rules. Conversations and their ledgers live behind a single
//! write lock, so every mutation (create with first message, append,
//! status transition) commits as one unit of work and mutations against
//! the same conversation are totally ordered. Reads clone from a committed
//! snapshot under the read lock.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{MessagingError, MessagingResult};
use crate::ledger::MessageLedger;
use crate::model::{
    snippet, Actor, ActorId, Conversation, ConversationId, ConversationType, Message,
};
use crate::scope::Scope;
use crate::workflow::{transition_note, validate_transition, ConversationStatus};

pub(crate) struct StoreInner {
    pub(crate) conversations: HashMap<ConversationId, Conversation>,
    pub(crate) messages: HashMap<ConversationId, Vec<Message>>,
}

/// Whether the actor may post to or transition the conversation: a
/// participant always may; queue-addressed conversations (no explicit
/// target) additionally accept any directed-role actor whose scope covers
/// the conversation's tenant.
pub(crate) fn can_participate(conv: &Conversation, actor: &Actor, scope: &Scope) -> bool {
    if conv.creator_id == actor.id || conv.target_id == Some(actor.id) {
        return true;
    }
    conv.target_id.is_none() && actor.role.is_directed() && scope.covers(conv.tenant_id)
}

/// Whether the conversation appears in the actor's listings at all.
fn visible(conv: &Conversation, scope: &Scope, actor_id: ActorId) -> bool {
    if conv.creator_id == actor_id || conv.target_id == Some(actor_id) {
        return true;
    }
    scope.covers(conv.tenant_id)
}

/// Append a message and refresh the owning conversation's denormalized
/// fields in the same unit of work. The author's read marker advances to
/// the new entry; the other side's does not. Callers hold the write lock
/// and have already verified the conversation exists.
pub(crate) fn record_message(
    inner: &mut StoreInner,
    conversation_id: ConversationId,
    author: Option<&Actor>,
    content: &str,
    is_system: bool,
) -> MessagingResult<Message> {
    let conv = inner
        .conversations
        .get_mut(&conversation_id)
        .ok_or(MessagingError::NotFound {
            entity: "conversation",
            id: conversation_id.to_string(),
        })?;

    let seq = conv.last_seq + 1;
    let message = Message {
        id: Uuid::new_v4(),
        conversation_id,
        author_id: author.map(|a| a.id),
        content: content.to_string(),
        is_system,
        seq,
        created_at: Utc::now(),
    };

    conv.last_seq = seq;
    conv.last_message_at = message.created_at;
    conv.last_message = Some(snippet(content));
    conv.last_author_id = message.author_id;
    conv.updated_at = message.created_at;
    if let Some(a) = author {
        conv.last_read.insert(a.id, seq);
    }

    inner.messages.entry(conversation_id).or_default().push(message.clone());
    Ok(message)
}

/// Conversation registry
#[derive(Clone)]
pub struct ConversationStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl ConversationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                conversations: HashMap::new(),
                messages: HashMap::new(),
            })),
        }
    }

    /// Message Ledger view over the same records
    pub fn ledger(&self) -> MessageLedger {
        MessageLedger::new(Arc::clone(&self.inner))
    }

    /// Create a conversation together with its first message.
    ///
    /// `target` must already be resolved and scope-checked by the caller
    /// (directed creators) or absent (queue-addressed creators). The tenant
    /// scope is inherited from the creator, falling back to the target for
    /// tenant-less creators (root).
    pub fn create(
        &self,
        actor: &Actor,
        conversation_type: ConversationType,
        subject: &str,
        initial_message: &str,
        target: Option<&Actor>,
    ) -> MessagingResult<Conversation> {
        if subject.trim().is_empty() {
            return Err(MessagingError::Validation("subject must not be empty".into()));
        }
        if initial_message.trim().is_empty() {
            return Err(MessagingError::Validation("message must not be empty".into()));
        }

        let now = Utc::now();
        let tenant_id = actor.tenant_id.or_else(|| target.and_then(|t| t.tenant_id));
        let conversation = Conversation {
            id: Uuid::new_v4(),
            conversation_type,
            subject: subject.trim().to_string(),
            status: ConversationStatus::Open,
            creator_id: actor.id,
            target_id: target.map(|t| t.id),
            tenant_id,
            last_message_at: now,
            last_message: None,
            last_author_id: None,
            last_seq: 0,
            last_read: HashMap::new(),
            created_at: now,
            updated_at: now,
        };

        let mut inner = self.inner.write();
        inner.conversations.insert(conversation.id, conversation.clone());
        record_message(&mut inner, conversation.id, Some(actor), initial_message, false)?;

        let created = inner.conversations[&conversation.id].clone();
        tracing::debug!(conversation = %created.id, creator = %actor.id, "conversation created");
        Ok(created)
    }

    /// List conversations visible to the actor, newest activity first.
    /// `search` filters case-insensitively on the subject, in memory.
    pub fn list(&self, scope: &Scope, actor_id: ActorId, search: Option<&str>) -> Vec<Conversation> {
        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let inner = self.inner.read();
        let mut out: Vec<Conversation> = inner
            .conversations
            .values()
            .filter(|c| visible(c, scope, actor_id))
            .filter(|c| match &needle {
                Some(n) => c.subject.to_lowercase().contains(n),
                None => true,
            })
            .cloned()
            .collect();

        out.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
        out
    }

    /// Fetch one conversation, enforcing visibility.
    pub fn get(
        &self,
        scope: &Scope,
        actor_id: ActorId,
        id: ConversationId,
    ) -> MessagingResult<Conversation> {
        let inner = self.inner.read();
        let conv = inner.conversations.get(&id).ok_or(MessagingError::NotFound {
            entity: "conversation",
            id: id.to_string(),
        })?;

        if !visible(conv, scope, actor_id) {
            return Err(MessagingError::Forbidden(format!(
                "conversation {id} is outside the caller's scope"
            )));
        }
        Ok(conv.clone())
    }

    /// Apply a caller-requested status transition, recording it as a system
    /// message in the same unit of work.
    pub fn transition(
        &self,
        scope: &Scope,
        actor: &Actor,
        id: ConversationId,
        requested: ConversationStatus,
    ) -> MessagingResult<Conversation> {
        let mut inner = self.inner.write();
        let conv = inner.conversations.get_mut(&id).ok_or(MessagingError::NotFound {
            entity: "conversation",
            id: id.to_string(),
        })?;

        if !can_participate(conv, actor, scope) {
            return Err(MessagingError::Forbidden(format!(
                "actor {} is not a participant of conversation {id}",
                actor.id
            )));
        }
        validate_transition(id, conv.status, requested)?;

        conv.status = requested;
        conv.updated_at = Utc::now();

        record_message(&mut inner, id, None, &transition_note(requested), true)?;
        // The transitioning actor has obviously seen their own transition.
        let conv = inner.conversations.get_mut(&id).ok_or(MessagingError::NotFound {
            entity: "conversation",
            id: id.to_string(),
        })?;
        let seq = conv.last_seq;
        conv.last_read.insert(actor.id, seq);

        tracing::debug!(conversation = %id, status = %requested, actor = %actor.id, "status transition");
        Ok(conv.clone())
    }

    /// Number of stored conversations
    pub fn count(&self) -> usize {
        self.inner.read().conversations.len()
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}
