/// Team model and database operations
///
/// Teams group users around shared decisions, chat messages and whiteboards.
/// New users join with an invite code; roles live on the `team_members` rows.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     invite_code VARCHAR(16) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT teams_invite_code_key UNIQUE (invite_code)
/// );
/// ```
///
/// Deleting a team removes its memberships, messages and whiteboards and sets
/// `team_id` to NULL on its decisions.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::team_member::TeamRole;

/// Length of generated invite codes
pub const INVITE_CODE_LENGTH: usize = 8;

const INVITE_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generates a random invite code of uppercase letters and digits
///
/// # Example
///
/// ```
/// use decisionlog_shared::models::team::{generate_invite_code, INVITE_CODE_LENGTH};
///
/// let code = generate_invite_code();
/// assert_eq!(code.len(), INVITE_CODE_LENGTH);
/// ```
pub fn generate_invite_code() -> String {
    let mut rng = rand::thread_rng();

    (0..INVITE_CODE_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..INVITE_CODE_CHARSET.len());
            INVITE_CODE_CHARSET[idx] as char
        })
        .collect()
}

/// Team model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub invite_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A team as seen by one of its members, including that member's role
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamWithRole {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub invite_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub role: TeamRole,
}

impl TeamWithRole {
    /// Attaches a member's role to a team row
    pub fn new(team: Team, role: TeamRole) -> Self {
        Self {
            id: team.id,
            name: team.name,
            description: team.description,
            invite_code: team.invite_code,
            created_at: team.created_at,
            updated_at: team.updated_at,
            role,
        }
    }
}

/// Input for creating a new team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeam {
    pub name: String,
    pub description: Option<String>,
}

/// Input for updating a team
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTeam {
    /// New name
    pub name: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,
}

const TEAM_COLUMNS: &str = "id, name, description, invite_code, created_at, updated_at";

impl Team {
    /// Creates a team and makes `owner_id` its owner
    ///
    /// Both rows are written in a single transaction so a team never exists
    /// without an owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the invite code collides (`teams_invite_code_key`),
    /// the owner doesn't exist, or the database connection fails.
    pub async fn create_with_owner(
        pool: &PgPool,
        data: CreateTeam,
        owner_id: Uuid,
    ) -> Result<TeamWithRole, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let team = sqlx::query_as::<_, Team>(&format!(
            r#"
            INSERT INTO teams (name, description, invite_code)
            VALUES ($1, $2, $3)
            RETURNING {TEAM_COLUMNS}
            "#
        ))
        .bind(data.name)
        .bind(data.description)
        .bind(generate_invite_code())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO team_members (team_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(team.id)
            .bind(owner_id)
            .bind(TeamRole::Owner)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(team_id = %team.id, owner_id = %owner_id, "Team created");

        Ok(TeamWithRole::new(team, TeamRole::Owner))
    }

    /// Finds a team by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(team)
    }

    /// Finds a team by its invite code (case-insensitive)
    pub async fn find_by_invite_code(
        pool: &PgPool,
        invite_code: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE invite_code = UPPER($1)"
        ))
        .bind(invite_code.trim())
        .fetch_optional(pool)
        .await?;

        Ok(team)
    }

    /// Lists the teams a user belongs to, with the user's role in each
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<TeamWithRole>, sqlx::Error> {
        let teams = sqlx::query_as::<_, TeamWithRole>(
            r#"
            SELECT t.id, t.name, t.description, t.invite_code, t.created_at, t.updated_at, tm.role
            FROM teams t
            JOIN team_members tm ON tm.team_id = t.id
            WHERE tm.user_id = $1
            ORDER BY tm.joined_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(teams)
    }

    /// Updates a team's name and/or description
    ///
    /// Returns None if the team doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTeam,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE teams SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {TEAM_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Team>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }

        let team = q.fetch_optional(pool).await?;

        Ok(team)
    }

    /// Deletes a team
    ///
    /// # Returns
    ///
    /// True if the team was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
