/// Team chat endpoints
///
/// History is a fixed window: the latest messages, returned oldest first so
/// a client can render them top to bottom.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::{extract::State, http::StatusCode, Extension};
use decisionlog_shared::{
    auth::{authorization::require_membership, middleware::AuthContext},
    models::{
        message::{Message, MessageWithSender, HISTORY_LIMIT},
        user::{User, UserSummary},
    },
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub team_id: Uuid,

    #[validate(length(min = 1, max = 4000, message = "Message must be between 1 and 4000 characters"))]
    pub content: String,
}

pub async fn list_messages(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(team_id): Path<Uuid>,
) -> ApiResult<Json<Vec<MessageWithSender>>> {
    require_membership(&state.db, team_id, auth.user_id).await?;

    let messages = Message::recent_for_team(&state.db, team_id, HISTORY_LIMIT).await?;

    Ok(Json(messages))
}

pub async fn send_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<(StatusCode, Json<MessageWithSender>)> {
    req.validate()?;

    let content = req.content.trim();
    if content.is_empty() {
        return Err(ApiError::invalid_field("content", "Message must not be blank"));
    }

    require_membership(&state.db, req.team_id, auth.user_id).await?;

    let sender = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

    let message = Message::create(&state.db, req.team_id, auth.user_id, content).await?;

    tracing::debug!(team_id = %req.team_id, message_id = %message.id, "Chat message sent");

    Ok((StatusCode::CREATED, Json(message.with_sender(UserSummary::from(&sender)))))
}
