/// Team chat messages
///
/// # Schema
///
/// ```sql
/// CREATE TABLE messages (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     content TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::user::UserSummary;

/// Number of messages returned by a history fetch
pub const HISTORY_LIMIT: i64 = 50;

/// Message model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A message with its sender's public profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageWithSender {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub sender: UserSummary,
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    team_id: Uuid,
    user_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
    sender_email: String,
    sender_full_name: Option<String>,
}

impl From<MessageRow> for MessageWithSender {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            team_id: row.team_id,
            user_id: row.user_id,
            content: row.content,
            created_at: row.created_at,
            sender: UserSummary {
                id: row.user_id,
                email: row.sender_email,
                full_name: row.sender_full_name,
            },
        }
    }
}

impl Message {
    /// Posts a message to a team
    pub async fn create(
        pool: &PgPool,
        team_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> Result<Self, sqlx::Error> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (team_id, user_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, team_id, user_id, content, created_at
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(pool)
        .await?;

        Ok(message)
    }

    /// Returns the latest `limit` messages of a team in chronological order
    pub async fn recent_for_team(
        pool: &PgPool,
        team_id: Uuid,
        limit: i64,
    ) -> Result<Vec<MessageWithSender>, sqlx::Error> {
        // Newest N first, then flipped so the client can append in order
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT * FROM (
                SELECT m.id, m.team_id, m.user_id, m.content, m.created_at,
                       u.email AS sender_email, u.full_name AS sender_full_name
                FROM messages m
                JOIN users u ON u.id = m.user_id
                WHERE m.team_id = $1
                ORDER BY m.created_at DESC
                LIMIT $2
            ) latest
            ORDER BY created_at ASC
            "#,
        )
        .bind(team_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(MessageWithSender::from).collect())
    }

    /// Attaches the sender profile to a freshly created message
    pub fn with_sender(self, sender: UserSummary) -> MessageWithSender {
        MessageWithSender {
            id: self.id,
            team_id: self.team_id,
            user_id: self.user_id,
            content: self.content,
            created_at: self.created_at,
            sender,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_sender_shape() {
        let user_id = Uuid::new_v4();
        let message = Message {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            user_id,
            content: "hello".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(message.with_sender(UserSummary {
            id: user_id,
            email: "a@example.com".to_string(),
            full_name: None,
        }))
        .unwrap();

        assert_eq!(json["content"], "hello");
        assert_eq!(json["sender"]["email"], "a@example.com");
        assert!(json["sender"]["full_name"].is_null());
    }
}
