//! Message Ledger
//!
//! Append-only, totally ordered list of messages per conversation. Entries
//! are ordered by creation time with ties broken by insertion sequence, and
//! are never mutated or removed. Reading a conversation advances the
//! viewer's read marker, which is what clears unread state: unread is
//! viewer-relative and derived, not stored per message.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{MessagingError, MessagingResult};
use crate::model::{Actor, ActorId, ConversationId, Message};
use crate::scope::Scope;
use crate::store::{can_participate, record_message, StoreInner};

/// Append/read view over the conversation records
#[derive(Clone)]
pub struct MessageLedger {
    inner: Arc<RwLock<StoreInner>>,
}

impl MessageLedger {
    pub(crate) fn new(inner: Arc<RwLock<StoreInner>>) -> Self {
        Self { inner }
    }

    /// Append a message to an open conversation.
    ///
    /// Fails `Validation` on empty content, `ConversationClosed` on terminal
    /// conversations and `Forbidden` when the author is not a participant.
    /// The owning conversation's activity fields and the author's read
    /// marker are updated in the same unit of work.
    pub fn append(
        &self,
        conversation_id: ConversationId,
        author: &Actor,
        scope: &Scope,
        content: &str,
    ) -> MessagingResult<Message> {
        if content.trim().is_empty() {
            return Err(MessagingError::Validation("message content must not be empty".into()));
        }

        let mut inner = self.inner.write();
        let conv = inner
            .conversations
            .get(&conversation_id)
            .ok_or(MessagingError::NotFound {
                entity: "conversation",
                id: conversation_id.to_string(),
            })?;

        if conv.status.is_terminal() {
            return Err(MessagingError::ConversationClosed(conversation_id));
        }
        if !can_participate(conv, author, scope) {
            return Err(MessagingError::Forbidden(format!(
                "actor {} is not a participant of conversation {conversation_id}",
                author.id
            )));
        }

        let message = record_message(&mut inner, conversation_id, Some(author), content, false)?;
        tracing::debug!(conversation = %conversation_id, author = %author.id, seq = message.seq, "message appended");
        Ok(message)
    }

    /// Read the full ordered message list as the given viewer.
    ///
    /// Advances the viewer's read marker to the latest entry, clearing their
    /// unread state. Visibility must already have been checked by the
    /// caller via the Conversation Store.
    pub fn list(&self, conversation_id: ConversationId, viewer: ActorId) -> MessagingResult<Vec<Message>> {
        let mut inner = self.inner.write();
        let conv = inner
            .conversations
            .get_mut(&conversation_id)
            .ok_or(MessagingError::NotFound {
                entity: "conversation",
                id: conversation_id.to_string(),
            })?;

        let latest = conv.last_seq;
        conv.last_read.insert(viewer, latest);

        Ok(inner.messages.get(&conversation_id).cloned().unwrap_or_default())
    }

    /// Number of entries in a conversation's ledger
    pub fn len(&self, conversation_id: ConversationId) -> usize {
        self.inner
            .read()
            .messages
            .get(&conversation_id)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Whether the conversation has no entries (never true for stored
    /// conversations, which are created with their first message)
    pub fn is_empty(&self, conversation_id: ConversationId) -> bool {
        self.len(conversation_id) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConversationType, Role};
    use crate::store::ConversationStore;
    use crate::workflow::ConversationStatus;
    use uuid::Uuid;

    fn actor(role: Role, tenant: Option<Uuid>) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role,
            tenant_id: tenant,
            first_name: "Test".into(),
            last_name: "Actor".into(),
            email: format!("{}@example.com", Uuid::new_v4()),
        }
    }

    #[test]
    fn test_append_preserves_order_and_rereads_are_stable() {
        let store = ConversationStore::new();
        let ledger = store.ledger();
        let tenant = Uuid::new_v4();
        let client = actor(Role::Client, Some(tenant));
        let admin = actor(Role::Admin, Some(tenant));
        let org = Scope::Organization(tenant);

        let conv = store
            .create(&client, ConversationType::Support, "Ayuda", "uno", None)
            .unwrap();
        ledger.append(conv.id, &admin, &org, "dos").unwrap();
        ledger.append(conv.id, &client, &Scope::SelfOnly, "tres").unwrap();

        let first_read: Vec<String> = ledger
            .list(conv.id, client.id)
            .unwrap()
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(first_read, vec!["uno", "dos", "tres"]);

        let second_read: Vec<String> = ledger
            .list(conv.id, client.id)
            .unwrap()
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(first_read, second_read);
    }

    #[test]
    fn test_empty_content_rejected() {
        let store = ConversationStore::new();
        let ledger = store.ledger();
        let tenant = Uuid::new_v4();
        let client = actor(Role::Client, Some(tenant));

        let conv = store
            .create(&client, ConversationType::Support, "Ayuda", "hola", None)
            .unwrap();
        let result = ledger.append(conv.id, &client, &Scope::SelfOnly, "   \n ");
        assert!(matches!(result, Err(MessagingError::Validation(_))));
        assert_eq!(ledger.len(conv.id), 1);
    }

    #[test]
    fn test_newlines_preserved() {
        let store = ConversationStore::new();
        let ledger = store.ledger();
        let tenant = Uuid::new_v4();
        let client = actor(Role::Client, Some(tenant));

        let conv = store
            .create(&client, ConversationType::Support, "Ayuda", "linea 1\nlinea 2", None)
            .unwrap();
        let messages = ledger.list(conv.id, client.id).unwrap();
        assert_eq!(messages[0].content, "linea 1\nlinea 2");
    }

    #[test]
    fn test_closed_conversation_accepts_no_messages() {
        let store = ConversationStore::new();
        let ledger = store.ledger();
        let tenant = Uuid::new_v4();
        let client = actor(Role::Client, Some(tenant));
        let scope = Scope::SelfOnly;

        let conv = store
            .create(&client, ConversationType::Support, "Ayuda", "hola", None)
            .unwrap();
        store.transition(&scope, &client, conv.id, ConversationStatus::Resolved).unwrap();
        store.transition(&scope, &client, conv.id, ConversationStatus::Closed).unwrap();

        let before = ledger.len(conv.id);
        let result = ledger.append(conv.id, &client, &scope, "una mas");
        assert!(matches!(result, Err(MessagingError::ConversationClosed(_))));
        assert_eq!(ledger.len(conv.id), before);
    }

    #[test]
    fn test_non_participant_cannot_append() {
        let store = ConversationStore::new();
        let ledger = store.ledger();
        let tenant = Uuid::new_v4();
        let client = actor(Role::Client, Some(tenant));
        let other_client = actor(Role::Client, Some(tenant));

        let conv = store
            .create(&client, ConversationType::Support, "Ayuda", "hola", None)
            .unwrap();
        let result = ledger.append(conv.id, &other_client, &Scope::SelfOnly, "intruso");
        assert!(matches!(result, Err(MessagingError::Forbidden(_))));
    }

    #[test]
    fn test_staff_can_answer_queue_conversation() {
        let store = ConversationStore::new();
        let ledger = store.ledger();
        let tenant = Uuid::new_v4();
        let client = actor(Role::Client, Some(tenant));
        let manager = actor(Role::Manager, Some(tenant));

        let conv = store
            .create(&client, ConversationType::Support, "Ayuda", "hola", None)
            .unwrap();
        let msg = ledger
            .append(conv.id, &manager, &Scope::Organization(tenant), "en ello")
            .unwrap();
        assert_eq!(msg.seq, 2);
    }

    #[test]
    fn test_unread_lifecycle() {
        let store = ConversationStore::new();
        let ledger = store.ledger();
        let tenant = Uuid::new_v4();
        let admin = actor(Role::Admin, Some(tenant));
        let user = actor(Role::User, Some(tenant));
        let org = Scope::Organization(tenant);

        let conv = store
            .create(&admin, ConversationType::General, "Factura pendiente", "Revisar por favor", Some(&user))
            .unwrap();

        // Creator has no unread for their own message; target does.
        let conv = store.get(&org, admin.id, conv.id).unwrap();
        assert!(!conv.has_unread(admin.id));
        assert!(conv.has_unread(user.id));

        // Target reads, unread clears.
        ledger.list(conv.id, user.id).unwrap();
        let conv = store.get(&org, admin.id, conv.id).unwrap();
        assert!(!conv.has_unread(user.id));

        // Target replies, creator now has unread.
        ledger.append(conv.id, &user, &Scope::SelfOnly, "Ya la revisé").unwrap();
        let conv = store.get(&org, admin.id, conv.id).unwrap();
        assert!(conv.has_unread(admin.id));
        assert!(!conv.has_unread(user.id));

        // Creator reads, unread clears.
        ledger.list(conv.id, admin.id).unwrap();
        let conv = store.get(&org, admin.id, conv.id).unwrap();
        assert!(!conv.has_unread(admin.id));
    }
}
