/// Decision assistant
///
/// `POST /bot/query` answers a handful of keyword questions about the
/// caller's own decisions. See [`decisionlog_shared::bot::answer`] for the rules.

use crate::{app::AppState, error::ApiResult, extract::Json};
use axum::{extract::State, Extension};
use decisionlog_shared::{
    auth::middleware::AuthContext,
    bot::{self, BotAnswer},
    models::decision::Decision,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct BotQueryRequest {
    pub query: String,
}

pub async fn query(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<BotQueryRequest>,
) -> ApiResult<Json<BotAnswer>> {
    let decisions = Decision::list_by_user(&state.db, auth.user_id).await?;

    tracing::debug!(user_id = %auth.user_id, decisions = decisions.len(), "Bot query");

    Ok(Json(bot::answer(&req.query, &decisions)))
}
