/// Decision endpoints
///
/// ```text
/// GET    /decisions?team_id=   the caller's decisions, or a team's (members only)
/// POST   /decisions            create; a team_id requires membership
/// GET    /decisions/:id        owner or team member
/// PUT    /decisions/:id        partial update, owner only
/// DELETE /decisions/:id        owner only
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path, Query},
    routes::double_option,
};
use axum::{extract::State, http::StatusCode, Extension};
use decisionlog_shared::{
    auth::{
        authorization::{authorize, require_membership, Relation, Resource},
        middleware::AuthContext,
    },
    models::decision::{
        CreateDecision, Decision, DecisionOutcome, DecisionStatus, UpdateDecision,
    },
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct ListDecisionsQuery {
    pub team_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDecisionRequest {
    pub team_id: Option<Uuid>,

    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    pub context: Option<String>,
    pub choice_made: Option<String>,

    #[validate(range(min = 1, max = 5, message = "Confidence level must be between 1 and 5"))]
    pub confidence_level: Option<i32>,

    pub status: Option<DecisionStatus>,
    pub outcome: Option<DecisionOutcome>,
    pub notes: Option<String>,
}

/// Partial update; `null` clears a text field
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDecisionRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub context: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub choice_made: Option<Option<String>>,

    #[validate(range(min = 1, max = 5, message = "Confidence level must be between 1 and 5"))]
    pub confidence_level: Option<i32>,

    pub status: Option<DecisionStatus>,
    pub outcome: Option<DecisionOutcome>,

    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

fn require_title(title: &str) -> ApiResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::invalid_field("title", "Title must not be blank"));
    }
    Ok(title.to_string())
}

/// Loads a decision or answers 404
pub(crate) async fn find_decision(db: &PgPool, id: Uuid) -> ApiResult<Decision> {
    Decision::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Decision {} not found", id)))
}

/// Loads a decision the caller may read (its owner or a member of its team)
pub(crate) async fn readable_decision(
    db: &PgPool,
    auth: &AuthContext,
    id: Uuid,
) -> ApiResult<Decision> {
    let decision = find_decision(db, id).await?;
    authorize(db, auth, &decision.resource_ref(), Relation::OwnerOrMember).await?;
    Ok(decision)
}

/// Loads a decision the caller owns
pub(crate) async fn owned_decision(db: &PgPool, auth: &AuthContext, id: Uuid) -> ApiResult<Decision> {
    let decision = find_decision(db, id).await?;
    authorize(db, auth, &decision.resource_ref(), Relation::Owner).await?;
    Ok(decision)
}

pub async fn list_decisions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<ListDecisionsQuery>,
) -> ApiResult<Json<Vec<Decision>>> {
    let decisions = match params.team_id {
        Some(team_id) => {
            require_membership(&state.db, team_id, auth.user_id).await?;
            Decision::list_by_team(&state.db, team_id).await?
        }
        None => Decision::list_by_user(&state.db, auth.user_id).await?,
    };

    Ok(Json(decisions))
}

pub async fn create_decision(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateDecisionRequest>,
) -> ApiResult<(StatusCode, Json<Decision>)> {
    req.validate()?;
    let title = require_title(&req.title)?;

    if let Some(team_id) = req.team_id {
        require_membership(&state.db, team_id, auth.user_id).await?;
    }

    let defaults = CreateDecision::default();
    let decision = Decision::create(
        &state.db,
        auth.user_id,
        CreateDecision {
            team_id: req.team_id,
            title,
            context: req.context,
            choice_made: req.choice_made,
            confidence_level: req.confidence_level.unwrap_or(defaults.confidence_level),
            status: req.status.unwrap_or_default(),
            outcome: req.outcome.unwrap_or_default(),
            notes: req.notes,
        },
    )
    .await?;

    tracing::info!(
        decision_id = %decision.id,
        user_id = %auth.user_id,
        team_id = ?decision.team_id,
        "Decision created"
    );

    Ok((StatusCode::CREATED, Json(decision)))
}

pub async fn get_decision(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Decision>> {
    Ok(Json(readable_decision(&state.db, &auth, id).await?))
}

pub async fn update_decision(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDecisionRequest>,
) -> ApiResult<Json<Decision>> {
    req.validate()?;

    owned_decision(&state.db, &auth, id).await?;

    let title = req.title.as_deref().map(require_title).transpose()?;

    let updated = Decision::update(
        &state.db,
        id,
        UpdateDecision {
            title,
            context: req.context,
            choice_made: req.choice_made,
            confidence_level: req.confidence_level,
            status: req.status,
            outcome: req.outcome,
            notes: req.notes,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Decision {} not found", id)))?;

    tracing::debug!(decision_id = %id, status = updated.status.as_str(), "Decision updated");

    Ok(Json(updated))
}

pub async fn delete_decision(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    owned_decision(&state.db, &auth, id).await?;

    if !Decision::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("Decision {} not found", id)));
    }

    tracing::info!(decision_id = %id, user_id = %auth.user_id, "Decision deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use decisionlog_shared::models::decision::{MAX_CONFIDENCE, MIN_CONFIDENCE};

    #[test]
    fn test_confidence_bounds_match_model() {
        for level in [MIN_CONFIDENCE, MAX_CONFIDENCE] {
            let req = CreateDecisionRequest {
                team_id: None,
                title: "Adopt library X".to_string(),
                context: None,
                choice_made: None,
                confidence_level: Some(level),
                status: None,
                outcome: None,
                notes: None,
            };
            assert!(req.validate().is_ok());
        }

        let too_high = CreateDecisionRequest {
            team_id: None,
            title: "Adopt library X".to_string(),
            context: None,
            choice_made: None,
            confidence_level: Some(MAX_CONFIDENCE + 1),
            status: None,
            outcome: None,
            notes: None,
        };
        let errors = too_high.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("confidence_level"));
    }

    #[test]
    fn test_update_request_parsing() {
        let req: UpdateDecisionRequest =
            serde_json::from_str(r#"{"status": "reviewed", "notes": null}"#).unwrap();
        assert_eq!(req.status, Some(DecisionStatus::Reviewed));
        assert_eq!(req.notes, Some(None));
        assert_eq!(req.context, None);

        assert!(serde_json::from_str::<UpdateDecisionRequest>(r#"{"status": "closed"}"#).is_err());
    }

    #[test]
    fn test_require_title() {
        assert_eq!(require_title("  Adopt X ").unwrap(), "Adopt X");
        assert!(matches!(require_title("   "), Err(ApiError::ValidationError(_))));
    }
}
