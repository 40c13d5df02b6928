/// Comment endpoints
///
/// Anyone who can read a decision can comment on it. Only the author may edit
/// or delete a comment.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
    routes::decisions::readable_decision,
};
use axum::{extract::State, http::StatusCode, Extension};
use decisionlog_shared::{
    auth::{
        authorization::{authorize, Relation, Resource},
        middleware::AuthContext,
    },
    models::comment::{Comment, CreateComment},
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub decision_id: Uuid,

    #[validate(length(min = 1, max = 10000, message = "Comment must be between 1 and 10000 characters"))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 10000, message = "Comment must be between 1 and 10000 characters"))]
    pub content: String,
}

fn require_content(content: &str) -> ApiResult<&str> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ApiError::invalid_field("content", "Comment must not be blank"));
    }
    Ok(content)
}

async fn owned_comment(db: &PgPool, auth: &AuthContext, id: Uuid) -> ApiResult<Comment> {
    let comment = Comment::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Comment {} not found", id)))?;

    authorize(db, auth, &comment.resource_ref(), Relation::Owner).await?;

    Ok(comment)
}

pub async fn list_comments(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(decision_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Comment>>> {
    readable_decision(&state.db, &auth, decision_id).await?;

    Ok(Json(Comment::list_by_decision(&state.db, decision_id).await?))
}

pub async fn create_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    req.validate()?;
    let content = require_content(&req.content)?.to_string();

    readable_decision(&state.db, &auth, req.decision_id).await?;

    let comment = Comment::create(
        &state.db,
        auth.user_id,
        CreateComment {
            decision_id: req.decision_id,
            content,
        },
    )
    .await?;

    tracing::debug!(comment_id = %comment.id, decision_id = %comment.decision_id, "Comment added");

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCommentRequest>,
) -> ApiResult<Json<Comment>> {
    req.validate()?;
    let content = require_content(&req.content)?;

    owned_comment(&state.db, &auth, id).await?;

    let comment = Comment::update_content(&state.db, id, content)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Comment {} not found", id)))?;

    Ok(Json(comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    owned_comment(&state.db, &auth, id).await?;

    if !Comment::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("Comment {} not found", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}
