/// Tag endpoints
///
/// Tags are personal. Attaching requires owning both the decision and the tag;
/// reading a decision's tags only requires read access to the decision.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
    routes::decisions::{owned_decision, readable_decision},
};
use axum::{extract::State, http::StatusCode, Extension};
use decisionlog_shared::{
    auth::{
        authorization::{authorize, Relation, Resource},
        middleware::AuthContext,
    },
    models::tag::{normalize_tag_name, DecisionTag, Tag},
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 100, message = "Tag name must be between 1 and 100 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AttachTagRequest {
    pub decision_id: Uuid,
    pub tag_id: Uuid,
}

async fn owned_tag(db: &PgPool, auth: &AuthContext, id: Uuid) -> ApiResult<Tag> {
    let tag = Tag::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Tag {} not found", id)))?;

    authorize(db, auth, &tag.resource_ref(), Relation::Owner).await?;

    Ok(tag)
}

pub async fn list_tags(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Tag>>> {
    Ok(Json(Tag::list_by_user(&state.db, auth.user_id).await?))
}

/// Answers 201 for a new tag and 200 when the caller already had one by that name
pub async fn create_tag(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTagRequest>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    req.validate()?;

    let name = normalize_tag_name(&req.name)
        .ok_or_else(|| ApiError::invalid_field("name", "Tag name must not be blank"))?;

    let (tag, created) = Tag::find_or_create(&state.db, auth.user_id, &name).await?;

    let status = if created {
        tracing::debug!(tag_id = %tag.id, user_id = %auth.user_id, "Tag created");
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(tag)))
}

pub async fn delete_tag(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    owned_tag(&state.db, &auth, id).await?;

    if !Tag::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("Tag {} not found", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_decision_tags(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(decision_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Tag>>> {
    readable_decision(&state.db, &auth, decision_id).await?;

    Ok(Json(Tag::list_for_decision(&state.db, decision_id).await?))
}

/// Idempotent: attaching an existing link succeeds with the same body
pub async fn attach_tag(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<AttachTagRequest>,
) -> ApiResult<Json<DecisionTag>> {
    owned_decision(&state.db, &auth, req.decision_id).await?;
    owned_tag(&state.db, &auth, req.tag_id).await?;

    if DecisionTag::attach(&state.db, req.decision_id, req.tag_id).await? {
        tracing::debug!(decision_id = %req.decision_id, tag_id = %req.tag_id, "Tag attached");
    }

    Ok(Json(DecisionTag {
        decision_id: req.decision_id,
        tag_id: req.tag_id,
    }))
}

pub async fn detach_tag(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((decision_id, tag_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    owned_decision(&state.db, &auth, decision_id).await?;

    if !DecisionTag::detach(&state.db, decision_id, tag_id).await? {
        return Err(ApiError::NotFound("Tag is not attached to this decision".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
