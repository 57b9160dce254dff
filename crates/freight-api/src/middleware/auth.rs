//! Authentication extractor
//!
//! The platform gateway authenticates callers upstream and forwards the
//! verified actor id in the `x-actor-id` header. The extractor resolves it
//! against the Identity Provider registry; unknown or missing identities are
//! rejected with 401 before any handler runs.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use freight_messaging::Actor;

use crate::models::ErrorBody;
use crate::ApiState;

/// Header carrying the verified caller id
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Resolved caller identity
pub struct CurrentActor(pub Actor);

fn unauthorized(message: &str) -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::UNAUTHORIZED, Json(ErrorBody::message(message)))
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for CurrentActor {
    type Rejection = (StatusCode, Json<ErrorBody>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("missing actor identity"))?;

        let id = Uuid::parse_str(raw).map_err(|_| unauthorized("malformed actor identity"))?;

        let actor = state
            .directory
            .find(id)
            .map_err(|e| {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ErrorBody::message(e.to_string())),
                )
            })?
            .ok_or_else(|| unauthorized("unknown actor"))?;

        Ok(CurrentActor(actor))
    }
}
