//! Conversation endpoints

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use std::sync::Arc;
use uuid::Uuid;

use freight_messaging::NewConversation;

use crate::error::{ok, ApiResult};
use crate::middleware::auth::CurrentActor;
use crate::models::*;
use crate::ApiState;

pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", post(create_conversation))
        .route("/mine", get(list_mine))
        .route("/:id", get(get_conversation))
        .route("/:id/messages", post(post_message))
        .route("/:id/status", patch(change_status))
}

/// Query parameters for the conversation listing
#[derive(serde::Deserialize)]
pub struct ListParams {
    search: Option<String>,
}

/// List the caller's conversations, newest activity first
#[utoipa::path(
    get,
    path = "/api/v1/conversations/mine",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive subject filter")
    ),
    responses(
        (status = 200, description = "Scoped conversation list", body = [ConversationDto])
    ),
    tag = "conversations"
)]
pub async fn list_mine(
    State(state): State<Arc<ApiState>>,
    CurrentActor(actor): CurrentActor,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<ConversationDto>> {
    let views = state
        .service
        .list_conversations(&actor, params.search.as_deref())?;
    ok(views.into_iter().map(ConversationDto::from).collect())
}

/// Fetch one conversation plus its full ordered message list.
/// Reading clears the caller's unread state.
#[utoipa::path(
    get,
    path = "/api/v1/conversations/{id}",
    params(("id" = Uuid, Path, description = "Conversation ID")),
    responses(
        (status = 200, description = "Conversation with messages", body = ConversationDetail),
        (status = 403, description = "Outside the caller's scope", body = ErrorBody),
        (status = 404, description = "Unknown conversation", body = ErrorBody)
    ),
    tag = "conversations"
)]
pub async fn get_conversation(
    State(state): State<Arc<ApiState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
) -> ApiResult<ConversationDetail> {
    let (conversation, messages) = state.service.get_conversation(&actor, id)?;
    ok(ConversationDetail {
        conversation: conversation.into(),
        messages: messages.into_iter().map(MessageDto::from).collect(),
    })
}

/// Open a conversation with its mandatory first message
#[utoipa::path(
    post,
    path = "/api/v1/conversations",
    request_body = CreateConversationRequest,
    responses(
        (status = 200, description = "Conversation created", body = ConversationDto),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 404, description = "Recipient not found or outside scope", body = ErrorBody)
    ),
    tag = "conversations"
)]
pub async fn create_conversation(
    State(state): State<Arc<ApiState>>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<CreateConversationRequest>,
) -> ApiResult<ConversationDto> {
    let view = state.service.create_conversation(
        &actor,
        NewConversation {
            conversation_type: body.conversation_type,
            subject: body.subject,
            message: body.message,
            target_user_id: body.target_user_id,
        },
    )?;
    ok(view.into())
}

/// Append a message to a conversation the caller participates in
#[utoipa::path(
    post,
    path = "/api/v1/conversations/{id}/messages",
    params(("id" = Uuid, Path, description = "Conversation ID")),
    request_body = PostMessageRequest,
    responses(
        (status = 200, description = "Message appended", body = MessageDto),
        (status = 400, description = "Empty content", body = ErrorBody),
        (status = 403, description = "Not a participant", body = ErrorBody),
        (status = 409, description = "Conversation is closed", body = ErrorBody)
    ),
    tag = "conversations"
)]
pub async fn post_message(
    State(state): State<Arc<ApiState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
    Json(body): Json<PostMessageRequest>,
) -> ApiResult<MessageDto> {
    let view = state.service.send_message(&actor, id, &body.content)?;
    ok(view.into())
}

/// Apply a status transition (RESOLVED or CLOSED)
#[utoipa::path(
    patch,
    path = "/api/v1/conversations/{id}/status",
    params(("id" = Uuid, Path, description = "Conversation ID")),
    request_body = ChangeStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ConversationDto),
        (status = 403, description = "Not a participant", body = ErrorBody),
        (status = 409, description = "Transition violates the workflow", body = ErrorBody)
    ),
    tag = "conversations"
)]
pub async fn change_status(
    State(state): State<Arc<ApiState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
    Json(body): Json<ChangeStatusRequest>,
) -> ApiResult<ConversationDto> {
    let view = state.service.change_status(&actor, id, body.status)?;
    ok(view.into())
}
