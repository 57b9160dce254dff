//! Recipient search endpoints

use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

use crate::error::{ok, ApiResult};
use crate::middleware::auth::CurrentActor;
use crate::models::{ErrorBody, RecipientDto};
use crate::ApiState;

pub fn router() -> Router<Arc<ApiState>> {
    Router::new().route("/search", get(search_users))
}

/// Query parameters for the recipient search
#[derive(serde::Deserialize)]
pub struct SearchParams {
    q: Option<String>,
}

/// Search addressable users under the caller's scope
#[utoipa::path(
    get,
    path = "/api/v1/users/search",
    params(
        ("q" = Option<String>, Query, description = "Substring matched against email and names; minimum 2 characters")
    ),
    responses(
        (status = 200, description = "Up to 10 candidates", body = [RecipientDto]),
        (status = 403, description = "Caller cannot choose a recipient", body = ErrorBody)
    ),
    tag = "users"
)]
pub async fn search_users(
    State(state): State<Arc<ApiState>>,
    CurrentActor(actor): CurrentActor,
    Query(params): Query<SearchParams>,
) -> ApiResult<Vec<RecipientDto>> {
    let hits = state
        .service
        .search_recipients(&actor, params.q.as_deref().unwrap_or_default())?;
    ok(hits.into_iter().map(RecipientDto::from).collect())
}

/// Organization-scope alias of the recipient search
#[utoipa::path(
    get,
    path = "/api/v1/org/users",
    params(
        ("q" = Option<String>, Query, description = "Substring matched against email and names; minimum 2 characters")
    ),
    responses(
        (status = 200, description = "Up to 10 candidates", body = [RecipientDto]),
        (status = 403, description = "Caller cannot choose a recipient", body = ErrorBody)
    ),
    tag = "users"
)]
pub async fn org_users(
    State(state): State<Arc<ApiState>>,
    CurrentActor(actor): CurrentActor,
    Query(params): Query<SearchParams>,
) -> ApiResult<Vec<RecipientDto>> {
    let hits = state
        .service
        .search_recipients(&actor, params.q.as_deref().unwrap_or_default())?;
    ok(hits.into_iter().map(RecipientDto::from).collect())
}
