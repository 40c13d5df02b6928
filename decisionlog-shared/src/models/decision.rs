/// Decision model and database operations
///
/// A decision is the central record of the log: what was chosen, in which
/// context, how confident the author was, and how it turned out. Decisions are
/// personal by default and can be shared with a team.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE decision_status AS ENUM ('pending', 'reviewed');
/// CREATE TYPE decision_outcome AS ENUM ('success', 'failure', 'unknown');
///
/// CREATE TABLE decisions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     team_id UUID REFERENCES teams(id) ON DELETE SET NULL,
///     title VARCHAR(500) NOT NULL,
///     context TEXT,
///     choice_made TEXT,
///     confidence_level INTEGER NOT NULL DEFAULT 3 CHECK (confidence_level BETWEEN 1 AND 5),
///     status decision_status NOT NULL DEFAULT 'pending',
///     outcome decision_outcome NOT NULL DEFAULT 'unknown',
///     notes TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use decisionlog_shared::models::decision::{CreateDecision, Decision, DecisionStatus, UpdateDecision};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let decision = Decision::create(&pool, user_id, CreateDecision {
///     title: "Adopt library X".to_string(),
///     confidence_level: 4,
///     ..Default::default()
/// }).await?;
///
/// Decision::update(&pool, decision.id, UpdateDecision {
///     status: Some(DecisionStatus::Reviewed),
///     ..Default::default()
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Lowest accepted confidence level
pub const MIN_CONFIDENCE: i32 = 1;

/// Highest accepted confidence level
pub const MAX_CONFIDENCE: i32 = 5;

/// Review state of a decision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "decision_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    /// Waiting for a retrospective review
    #[default]
    Pending,

    /// Outcome has been reviewed
    Reviewed,
}

impl DecisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStatus::Pending => "pending",
            DecisionStatus::Reviewed => "reviewed",
        }
    }
}

/// How a decision turned out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "decision_outcome", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DecisionOutcome {
    Success,
    Failure,
    #[default]
    Unknown,
}

impl DecisionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionOutcome::Success => "success",
            DecisionOutcome::Failure => "failure",
            DecisionOutcome::Unknown => "unknown",
        }
    }
}

/// Decision model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Decision {
    /// Unique decision ID
    pub id: Uuid,

    /// Author and owner
    pub user_id: Uuid,

    /// Team the decision is shared with, if any
    pub team_id: Option<Uuid>,

    pub title: String,
    pub context: Option<String>,
    pub choice_made: Option<String>,

    /// 1 (guess) to 5 (certain)
    pub confidence_level: i32,

    pub status: DecisionStatus,
    pub outcome: DecisionOutcome,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a decision
///
/// The owner is never part of the input; it comes from the authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDecision {
    pub team_id: Option<Uuid>,
    pub title: String,
    pub context: Option<String>,
    pub choice_made: Option<String>,
    pub confidence_level: i32,
    pub status: DecisionStatus,
    pub outcome: DecisionOutcome,
    pub notes: Option<String>,
}

impl Default for CreateDecision {
    fn default() -> Self {
        Self {
            team_id: None,
            title: String::new(),
            context: None,
            choice_made: None,
            confidence_level: 3,
            status: DecisionStatus::default(),
            outcome: DecisionOutcome::default(),
            notes: None,
        }
    }
}

/// Input for updating a decision
///
/// All fields are optional. Only non-None fields will be updated.
/// Nullable text columns use `Some(None)` to clear.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDecision {
    pub title: Option<String>,
    pub context: Option<Option<String>>,
    pub choice_made: Option<Option<String>>,
    pub confidence_level: Option<i32>,
    pub status: Option<DecisionStatus>,
    pub outcome: Option<DecisionOutcome>,
    pub notes: Option<Option<String>>,
}

const DECISION_COLUMNS: &str = "id, user_id, team_id, title, context, choice_made, \
    confidence_level, status, outcome, notes, created_at, updated_at";

impl Decision {
    /// Creates a decision owned by `user_id`
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        data: CreateDecision,
    ) -> Result<Self, sqlx::Error> {
        let decision = sqlx::query_as::<_, Decision>(&format!(
            r#"
            INSERT INTO decisions
                (user_id, team_id, title, context, choice_made, confidence_level, status, outcome, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {DECISION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(data.team_id)
        .bind(data.title)
        .bind(data.context)
        .bind(data.choice_made)
        .bind(data.confidence_level)
        .bind(data.status)
        .bind(data.outcome)
        .bind(data.notes)
        .fetch_one(pool)
        .await?;

        Ok(decision)
    }

    /// Finds a decision by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let decision = sqlx::query_as::<_, Decision>(&format!(
            "SELECT {DECISION_COLUMNS} FROM decisions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(decision)
    }

    /// Lists decisions authored by a user, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let decisions = sqlx::query_as::<_, Decision>(&format!(
            r#"
            SELECT {DECISION_COLUMNS}
            FROM decisions
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(decisions)
    }

    /// Lists decisions shared with a team, newest first
    pub async fn list_by_team(pool: &PgPool, team_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let decisions = sqlx::query_as::<_, Decision>(&format!(
            r#"
            SELECT {DECISION_COLUMNS}
            FROM decisions
            WHERE team_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(team_id)
        .fetch_all(pool)
        .await?;

        Ok(decisions)
    }

    /// Applies a partial update
    ///
    /// Returns None if the decision doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateDecision,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE decisions SET updated_at = NOW()");
        let mut bind_count = 1;

        let mut push = |column: &str, present: bool| {
            if present {
                bind_count += 1;
                query.push_str(&format!(", {} = ${}", column, bind_count));
            }
        };

        push("title", data.title.is_some());
        push("context", data.context.is_some());
        push("choice_made", data.choice_made.is_some());
        push("confidence_level", data.confidence_level.is_some());
        push("status", data.status.is_some());
        push("outcome", data.outcome.is_some());
        push("notes", data.notes.is_some());

        query.push_str(&format!(" WHERE id = $1 RETURNING {DECISION_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Decision>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(context) = data.context {
            q = q.bind(context);
        }
        if let Some(choice_made) = data.choice_made {
            q = q.bind(choice_made);
        }
        if let Some(confidence_level) = data.confidence_level {
            q = q.bind(confidence_level);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(outcome) = data.outcome {
            q = q.bind(outcome);
        }
        if let Some(notes) = data.notes {
            q = q.bind(notes);
        }

        let decision = q.fetch_optional(pool).await?;

        Ok(decision)
    }

    /// Deletes a decision along with its comments, votes and tag links
    ///
    /// # Returns
    ///
    /// True if the decision was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM decisions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_outcome_defaults() {
        assert_eq!(DecisionStatus::default(), DecisionStatus::Pending);
        assert_eq!(DecisionOutcome::default(), DecisionOutcome::Unknown);
    }

    #[test]
    fn test_create_decision_default_confidence() {
        let data = CreateDecision::default();
        assert_eq!(data.confidence_level, 3);
        assert!(data.team_id.is_none());
    }

    #[test]
    fn test_enum_serialization_is_lowercase() {
        assert_eq!(serde_json::to_value(DecisionStatus::Reviewed).unwrap(), "reviewed");
        assert_eq!(serde_json::to_value(DecisionOutcome::Failure).unwrap(), "failure");
        assert_eq!(DecisionOutcome::Success.as_str(), "success");
        assert_eq!(DecisionStatus::Pending.as_str(), "pending");
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let parsed: Result<DecisionStatus, _> = serde_json::from_value(serde_json::json!("archived"));
        assert!(parsed.is_err());
    }
}
