/// Vote endpoints
///
/// One vote per user per decision: voting again replaces the earlier vote.
/// Anyone who can read a decision may vote on it.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
    routes::decisions::readable_decision,
};
use axum::{extract::State, http::StatusCode, Extension};
use decisionlog_shared::{
    auth::middleware::AuthContext,
    models::vote::{Vote, VoteKind, VoteSummary},
};
use serde::Deserialize;
use uuid::Uuid;

/// `vote` is parsed by hand so an unknown kind gets a precise message
#[derive(Debug, Deserialize)]
pub struct CastVoteRequest {
    pub decision_id: Uuid,
    pub vote: String,
}

pub async fn vote_summary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(decision_id): Path<Uuid>,
) -> ApiResult<Json<VoteSummary>> {
    readable_decision(&state.db, &auth, decision_id).await?;

    let summary = Vote::summary(&state.db, decision_id, auth.user_id).await?;

    Ok(Json(summary))
}

pub async fn cast_vote(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CastVoteRequest>,
) -> ApiResult<Json<Vote>> {
    let kind: VoteKind = req.vote.parse().map_err(ApiError::BadRequest)?;

    readable_decision(&state.db, &auth, req.decision_id).await?;

    let vote = Vote::upsert(&state.db, req.decision_id, auth.user_id, kind).await?;

    tracing::debug!(
        decision_id = %req.decision_id,
        user_id = %auth.user_id,
        vote = %kind,
        "Vote cast"
    );

    Ok(Json(vote))
}

/// Succeeds whether or not the caller had voted
pub async fn retract_vote(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(decision_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if Vote::delete(&state.db, decision_id, auth.user_id).await? {
        tracing::debug!(decision_id = %decision_id, user_id = %auth.user_id, "Vote retracted");
    }

    Ok(StatusCode::NO_CONTENT)
}
