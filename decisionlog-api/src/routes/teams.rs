/// Team endpoints
///
/// ```text
/// GET    /teams                          teams the caller belongs to, with role
/// POST   /teams                          create; the caller becomes owner
/// POST   /teams/join                     join by invite code
/// PUT    /teams/:id                      admin or owner
/// DELETE /teams/:id                      owner only
/// GET    /teams/:id/members              members only
/// PUT    /teams/:id/members/:user_id     owner only; ownership can't move
/// DELETE /teams/:id/members/:user_id     leave, or remove someone of lower rank
/// GET    /teams/:id/decisions            members only
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
    routes::double_option,
};
use axum::{extract::State, http::StatusCode, Extension};
use decisionlog_shared::{
    auth::{
        authorization::{authorize, require_membership, AuthzError, Relation, Resource},
        middleware::AuthContext,
    },
    models::{
        decision::Decision,
        team::{CreateTeam, Team, TeamWithRole, UpdateTeam},
        team_member::{CreateTeamMember, TeamMember, TeamMemberDetail, TeamRole},
    },
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 255, message = "Team name must be between 1 and 255 characters"))]
    pub name: String,

    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTeamRequest {
    #[validate(length(min = 1, max = 255, message = "Team name must be between 1 and 255 characters"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct JoinTeamRequest {
    pub invite_code: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMemberRoleRequest {
    pub role: String,
}

async fn find_team(db: &PgPool, id: Uuid) -> ApiResult<Team> {
    Team::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Team {} not found", id)))
}

fn require_name(name: &str) -> ApiResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::invalid_field("name", "Team name must not be blank"));
    }
    Ok(name.to_string())
}

pub async fn list_teams(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<TeamWithRole>>> {
    Ok(Json(Team::list_for_user(&state.db, auth.user_id).await?))
}

pub async fn create_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTeamRequest>,
) -> ApiResult<(StatusCode, Json<TeamWithRole>)> {
    req.validate()?;

    let team = Team::create_with_owner(
        &state.db,
        CreateTeam {
            name: require_name(&req.name)?,
            description: req.description,
        },
        auth.user_id,
    )
    .await?;

    tracing::info!(team_id = %team.id, owner_id = %auth.user_id, "Team created");

    Ok((StatusCode::CREATED, Json(team)))
}

pub async fn join_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<JoinTeamRequest>,
) -> ApiResult<Json<TeamWithRole>> {
    let team = Team::find_by_invite_code(&state.db, &req.invite_code)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    if TeamMember::is_member(&state.db, team.id, auth.user_id).await? {
        return Err(ApiError::Conflict("Already a member of this team".to_string()));
    }

    // A concurrent join still fails on the primary key and maps to 409
    let member = TeamMember::create(
        &state.db,
        CreateTeamMember {
            team_id: team.id,
            user_id: auth.user_id,
            role: TeamRole::Member,
        },
    )
    .await?;

    tracing::info!(team_id = %team.id, user_id = %auth.user_id, "User joined team");

    Ok(Json(TeamWithRole::new(team, member.role)))
}

pub async fn update_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTeamRequest>,
) -> ApiResult<Json<Team>> {
    req.validate()?;

    let team = find_team(&state.db, id).await?;
    authorize(
        &state.db,
        &auth,
        &team.resource_ref(),
        Relation::TeamRole(TeamRole::Admin),
    )
    .await?;

    let name = req.name.as_deref().map(require_name).transpose()?;

    let team = Team::update(
        &state.db,
        id,
        UpdateTeam {
            name,
            description: req.description,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Team {} not found", id)))?;

    Ok(Json(team))
}

/// Memberships, chat history and whiteboards go with the team; its
/// decisions stay with their owners, detached from the team
pub async fn delete_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let team = find_team(&state.db, id).await?;
    authorize(
        &state.db,
        &auth,
        &team.resource_ref(),
        Relation::TeamRole(TeamRole::Owner),
    )
    .await?;

    if !Team::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("Team {} not found", id)));
    }

    tracing::info!(team_id = %id, user_id = %auth.user_id, "Team deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<TeamMemberDetail>>> {
    find_team(&state.db, id).await?;
    require_membership(&state.db, id, auth.user_id).await?;

    Ok(Json(TeamMember::list_by_team(&state.db, id).await?))
}

pub async fn update_member_role(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateMemberRoleRequest>,
) -> ApiResult<Json<TeamMember>> {
    let role: TeamRole = req.role.parse().map_err(ApiError::BadRequest)?;

    find_team(&state.db, id).await?;

    let actor = require_membership(&state.db, id, auth.user_id).await?;
    if !actor.can_delete_team() {
        return Err(AuthzError::InsufficientRole {
            required: TeamRole::Owner,
            actual: actor,
        }
        .into());
    }

    if role == TeamRole::Owner {
        return Err(ApiError::BadRequest("Team ownership cannot be granted".to_string()));
    }

    let target = TeamMember::find(&state.db, id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    if target.role == TeamRole::Owner {
        return Err(ApiError::BadRequest("The team owner's role cannot be changed".to_string()));
    }

    let member = TeamMember::update_role(&state.db, id, user_id, role)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    tracing::info!(team_id = %id, user_id = %user_id, role = %role, "Member role changed");

    Ok(Json(member))
}

/// Whether `actor` may remove a member holding `target`
///
/// Admins and owners may remove anyone ranked strictly below them.
fn can_remove(actor: TeamRole, target: TeamRole) -> bool {
    actor.can_manage_team() && actor.has_permission(&target) && actor != target
}

pub async fn remove_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    find_team(&state.db, id).await?;

    let actor = require_membership(&state.db, id, auth.user_id).await?;

    let target = TeamMember::find(&state.db, id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    if user_id == auth.user_id {
        if actor == TeamRole::Owner {
            return Err(ApiError::BadRequest(
                "The team owner cannot leave; delete the team instead".to_string(),
            ));
        }
    } else if !can_remove(actor, target.role) {
        return Err(ApiError::Forbidden(format!(
            "A team {} cannot remove a team {}",
            actor, target.role
        )));
    }

    TeamMember::delete(&state.db, id, user_id).await?;

    tracing::info!(team_id = %id, user_id = %user_id, removed_by = %auth.user_id, "Member removed");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_team_decisions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Decision>>> {
    find_team(&state.db, id).await?;
    require_membership(&state.db, id, auth.user_id).await?;

    Ok(Json(Decision::list_by_team(&state.db, id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_remove() {
        assert!(can_remove(TeamRole::Owner, TeamRole::Admin));
        assert!(can_remove(TeamRole::Owner, TeamRole::Member));
        assert!(can_remove(TeamRole::Admin, TeamRole::Member));

        assert!(!can_remove(TeamRole::Admin, TeamRole::Admin));
        assert!(!can_remove(TeamRole::Admin, TeamRole::Owner));
        assert!(!can_remove(TeamRole::Member, TeamRole::Member));
    }

    #[test]
    fn test_require_name() {
        assert_eq!(require_name(" Core ").unwrap(), "Core");
        assert!(require_name("  ").is_err());
    }
}
