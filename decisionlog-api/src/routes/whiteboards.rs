/// Whiteboard endpoints
///
/// A whiteboard is either personal (no team, visible to its creator) or shared
/// with a team (visible to and editable by current members only, the creator
/// included). Only the creator may delete one. `data` is an opaque JSON
/// document stored as text.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path, Query},
};
use axum::{extract::State, http::StatusCode, Extension};
use decisionlog_shared::{
    auth::{
        authorization::{authorize, require_membership, Relation, Resource},
        middleware::AuthContext,
    },
    models::team_member::TeamRole,
    models::whiteboard::{
        is_valid_board_data, CreateWhiteboard, UpdateWhiteboard, Whiteboard, EMPTY_BOARD,
    },
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct ListWhiteboardsQuery {
    pub team_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateWhiteboardRequest {
    pub team_id: Option<Uuid>,

    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    pub data: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateWhiteboardRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,

    pub data: Option<String>,
}

fn check_board_data(data: &str) -> ApiResult<()> {
    if is_valid_board_data(data) {
        Ok(())
    } else {
        Err(ApiError::BadRequest("Whiteboard data must be valid JSON".to_string()))
    }
}

fn require_name(name: &str) -> ApiResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::invalid_field("name", "Name must not be blank"));
    }
    Ok(name.to_string())
}

/// Relation needed to read or edit a board
///
/// Team boards follow team membership, so a creator who leaves the team loses
/// access along with everyone else.
fn edit_relation(board: &Whiteboard) -> Relation {
    match board.team_id {
        Some(_) => Relation::TeamRole(TeamRole::Member),
        None => Relation::Owner,
    }
}

async fn load_whiteboard(
    db: &PgPool,
    auth: &AuthContext,
    id: Uuid,
    relation_for: fn(&Whiteboard) -> Relation,
) -> ApiResult<Whiteboard> {
    let board = Whiteboard::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Whiteboard {} not found", id)))?;

    authorize(db, auth, &board.resource_ref(), relation_for(&board)).await?;

    Ok(board)
}

pub async fn list_whiteboards(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<ListWhiteboardsQuery>,
) -> ApiResult<Json<Vec<Whiteboard>>> {
    let boards = match params.team_id {
        Some(team_id) => {
            require_membership(&state.db, team_id, auth.user_id).await?;
            Whiteboard::list_by_team(&state.db, team_id).await?
        }
        None => Whiteboard::list_by_user(&state.db, auth.user_id).await?,
    };

    Ok(Json(boards))
}

pub async fn get_whiteboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Whiteboard>> {
    let board = load_whiteboard(&state.db, &auth, id, edit_relation).await?;
    Ok(Json(board))
}

pub async fn create_whiteboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateWhiteboardRequest>,
) -> ApiResult<(StatusCode, Json<Whiteboard>)> {
    req.validate()?;
    let name = require_name(&req.name)?;

    let data = req.data.unwrap_or_else(|| EMPTY_BOARD.to_string());
    check_board_data(&data)?;

    if let Some(team_id) = req.team_id {
        require_membership(&state.db, team_id, auth.user_id).await?;
    }

    let board = Whiteboard::create(
        &state.db,
        auth.user_id,
        CreateWhiteboard {
            team_id: req.team_id,
            name,
            data,
        },
    )
    .await?;

    tracing::debug!(whiteboard_id = %board.id, team_id = ?board.team_id, "Whiteboard created");

    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn update_whiteboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateWhiteboardRequest>,
) -> ApiResult<Json<Whiteboard>> {
    req.validate()?;
    let name = req.name.as_deref().map(require_name).transpose()?;

    if let Some(data) = &req.data {
        check_board_data(data)?;
    }

    load_whiteboard(&state.db, &auth, id, edit_relation).await?;

    let board = Whiteboard::update(
        &state.db,
        id,
        UpdateWhiteboard {
            name,
            data: req.data,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Whiteboard {} not found", id)))?;

    Ok(Json(board))
}

pub async fn delete_whiteboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    load_whiteboard(&state.db, &auth, id, |_| Relation::Owner).await?;

    if !Whiteboard::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("Whiteboard {} not found", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_board_data() {
        assert!(check_board_data(EMPTY_BOARD).is_ok());
        assert!(check_board_data(r#"[{"type":"line","points":[0,0,10,10]}]"#).is_ok());
        assert!(matches!(check_board_data("[{"), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_require_name() {
        assert_eq!(require_name(" Sketch ").unwrap(), "Sketch");
        assert!(matches!(require_name("   "), Err(ApiError::ValidationError(_))));
    }

    fn board(team_id: Option<Uuid>) -> Whiteboard {
        let now = sqlx::types::chrono::Utc::now();
        Whiteboard {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            team_id,
            name: "Sketch".to_string(),
            data: EMPTY_BOARD.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_edit_relation_follows_team() {
        assert_eq!(edit_relation(&board(None)), Relation::Owner);
        assert_eq!(
            edit_relation(&board(Some(Uuid::new_v4()))),
            Relation::TeamRole(TeamRole::Member)
        );
    }
}
