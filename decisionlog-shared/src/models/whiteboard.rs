/// Whiteboard model and database operations
///
/// A whiteboard stores a drawing as an opaque JSON document. It belongs to its
/// creator and can optionally be shared with a team, in which case every team
/// member may read and edit it. Only the creator can delete it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE whiteboards (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     team_id UUID REFERENCES teams(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     data TEXT NOT NULL DEFAULT '[]',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Document stored for a new whiteboard when none is given
pub const EMPTY_BOARD: &str = "[]";

/// Whiteboard model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Whiteboard {
    pub id: Uuid,

    /// Creator
    pub user_id: Uuid,

    pub team_id: Option<Uuid>,
    pub name: String,

    /// Serialized drawing, always valid JSON
    pub data: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a whiteboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWhiteboard {
    pub team_id: Option<Uuid>,
    pub name: String,
    pub data: String,
}

/// Input for updating a whiteboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWhiteboard {
    pub name: Option<String>,
    pub data: Option<String>,
}

/// Checks that a whiteboard document parses as JSON
pub fn is_valid_board_data(data: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(data).is_ok()
}

const WHITEBOARD_COLUMNS: &str = "id, user_id, team_id, name, data, created_at, updated_at";

impl Whiteboard {
    /// Creates a whiteboard owned by `user_id`
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        data: CreateWhiteboard,
    ) -> Result<Self, sqlx::Error> {
        let board = sqlx::query_as::<_, Whiteboard>(&format!(
            r#"
            INSERT INTO whiteboards (user_id, team_id, name, data)
            VALUES ($1, $2, $3, $4)
            RETURNING {WHITEBOARD_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(data.team_id)
        .bind(data.name)
        .bind(data.data)
        .fetch_one(pool)
        .await?;

        Ok(board)
    }

    /// Finds a whiteboard by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let board = sqlx::query_as::<_, Whiteboard>(&format!(
            "SELECT {WHITEBOARD_COLUMNS} FROM whiteboards WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(board)
    }

    /// Lists a user's personal (team-less) whiteboards, most recently edited first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let boards = sqlx::query_as::<_, Whiteboard>(&format!(
            r#"
            SELECT {WHITEBOARD_COLUMNS}
            FROM whiteboards
            WHERE user_id = $1 AND team_id IS NULL
            ORDER BY updated_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(boards)
    }

    /// Lists a team's whiteboards, most recently edited first
    pub async fn list_by_team(pool: &PgPool, team_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let boards = sqlx::query_as::<_, Whiteboard>(&format!(
            r#"
            SELECT {WHITEBOARD_COLUMNS}
            FROM whiteboards
            WHERE team_id = $1
            ORDER BY updated_at DESC
            "#
        ))
        .bind(team_id)
        .fetch_all(pool)
        .await?;

        Ok(boards)
    }

    /// Updates name and/or data
    ///
    /// Returns None if the whiteboard doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateWhiteboard,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE whiteboards SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.data.is_some() {
            bind_count += 1;
            query.push_str(&format!(", data = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {WHITEBOARD_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Whiteboard>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(board_data) = data.data {
            q = q.bind(board_data);
        }

        let board = q.fetch_optional(pool).await?;

        Ok(board)
    }

    /// Deletes a whiteboard
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM whiteboards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
