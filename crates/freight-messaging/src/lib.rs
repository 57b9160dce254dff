//! OpenFreight Conversation & Messaging Engine
//!
//! Multi-tenant support channel for the OpenFreight logistics platform.
//! Platform operators, organization staff and end clients exchange threaded
//! conversations about support, billing or general topics, with role-scoped
//! visibility and a resolution workflow.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     CONVERSATION SERVICE                            │
//! │        list | open | create | send message | change status          │
//! └───────┬──────────────┬───────────────┬────────────────┬────────────┘
//!         │              │               │                │
//! ┌───────▼──────┐ ┌─────▼────────┐ ┌────▼─────────┐ ┌────▼───────────┐
//! │    SCOPE     │ │  RECIPIENT   │ │ CONVERSATION │ │    MESSAGE     │
//! │   RESOLVER   │ │  DIRECTORY   │ │    STORE     │ │    LEDGER      │
//! │ role → scope │ │ scoped user  │ │ visibility + │ │ append-only +  │
//! │              │ │   search     │ │  lifecycle   │ │ unread markers │
//! └──────────────┘ └──────┬───────┘ └──────────────┘ └────────────────┘
//!                         │
//!                  ┌──────▼───────┐
//!                  │    USER      │
//!                  │  DIRECTORY   │  (external collaborator)
//!                  └──────────────┘
//! ```

#![warn(missing_docs)]
#![allow(dead_code)]

pub mod directory;
pub mod error;
pub mod ledger;
pub mod model;
pub mod scope;
pub mod service;
pub mod store;
pub mod workflow;

pub use directory::{InMemoryDirectory, RecipientDirectory, UserDirectory};
pub use error::{MessagingError, MessagingResult};
pub use ledger::MessageLedger;
pub use model::{Actor, ActorId, Conversation, ConversationId, ConversationType, Message, RecipientCandidate, Role, TenantId};
pub use scope::Scope;
pub use service::{ConversationService, ConversationView, MessageView, NewConversation};
pub use store::ConversationStore;
pub use workflow::ConversationStatus;
