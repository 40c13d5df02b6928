/// Tag model and decision-tag links
///
/// Tags are personal labels: each user keeps their own namespace and a name is
/// unique within it. Links between tags and decisions live in `decision_tags`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tags (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     name VARCHAR(100) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT tags_user_id_name_key UNIQUE (user_id, name)
/// );
///
/// CREATE TABLE decision_tags (
///     decision_id UUID NOT NULL REFERENCES decisions(id) ON DELETE CASCADE,
///     tag_id UUID NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
///     PRIMARY KEY (decision_id, tag_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Tag model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: Uuid,

    /// Owner of the tag
    pub user_id: Uuid,

    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Link between a decision and a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DecisionTag {
    pub decision_id: Uuid,
    pub tag_id: Uuid,
}

impl Tag {
    /// Returns the user's tag with this name, creating it if needed
    ///
    /// The boolean is true when a new tag was inserted. Concurrent calls for the
    /// same name resolve to the same row through `ON CONFLICT`.
    pub async fn find_or_create(
        pool: &PgPool,
        user_id: Uuid,
        name: &str,
    ) -> Result<(Self, bool), sqlx::Error> {
        let inserted = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (user_id, name)
            VALUES ($1, $2)
            ON CONFLICT ON CONSTRAINT tags_user_id_name_key DO NOTHING
            RETURNING id, user_id, name, created_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_optional(pool)
        .await?;

        if let Some(tag) = inserted {
            return Ok((tag, true));
        }

        let existing = sqlx::query_as::<_, Tag>(
            "SELECT id, user_id, name, created_at FROM tags WHERE user_id = $1 AND name = $2",
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok((existing, false))
    }

    /// Finds a tag by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let tag = sqlx::query_as::<_, Tag>(
            "SELECT id, user_id, name, created_at FROM tags WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(tag)
    }

    /// Lists a user's tags in alphabetical order
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, user_id, name, created_at
            FROM tags
            WHERE user_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tags)
    }

    /// Lists the tags attached to a decision
    pub async fn list_for_decision(
        pool: &PgPool,
        decision_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.user_id, t.name, t.created_at
            FROM tags t
            JOIN decision_tags dt ON dt.tag_id = t.id
            WHERE dt.decision_id = $1
            ORDER BY t.name ASC
            "#,
        )
        .bind(decision_id)
        .fetch_all(pool)
        .await?;

        Ok(tags)
    }

    /// Deletes a tag and all of its decision links
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl DecisionTag {
    /// Attaches a tag to a decision
    ///
    /// # Returns
    ///
    /// True if a new link was created, false if it already existed
    pub async fn attach(pool: &PgPool, decision_id: Uuid, tag_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO decision_tags (decision_id, tag_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(decision_id)
        .bind(tag_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes a tag from a decision
    ///
    /// # Returns
    ///
    /// True if a link was removed, false if none existed
    pub async fn detach(pool: &PgPool, decision_id: Uuid, tag_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM decision_tags WHERE decision_id = $1 AND tag_id = $2")
            .bind(decision_id)
            .bind(tag_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Normalizes a tag name: surrounding whitespace is dropped
///
/// Returns None for names that are empty after trimming.
pub fn normalize_tag_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tag_name() {
        assert_eq!(normalize_tag_name("  hiring "), Some("hiring".to_string()));
        assert_eq!(normalize_tag_name("Q3 planning"), Some("Q3 planning".to_string()));
        assert_eq!(normalize_tag_name("   "), None);
        assert_eq!(normalize_tag_name(""), None);
    }
}
