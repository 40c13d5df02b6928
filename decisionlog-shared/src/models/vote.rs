/// Vote model and database operations
///
/// Each user holds at most one vote per decision. Casting again replaces the
/// previous choice instead of adding a second row.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE vote_kind AS ENUM ('approve', 'reject', 'abstain');
///
/// CREATE TABLE votes (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     decision_id UUID NOT NULL REFERENCES decisions(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     vote vote_kind NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT votes_decision_id_user_id_key UNIQUE (decision_id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A voter's position on a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "vote_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Approve,
    Reject,
    Abstain,
}

impl VoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteKind::Approve => "approve",
            VoteKind::Reject => "reject",
            VoteKind::Abstain => "abstain",
        }
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "approve" => Ok(VoteKind::Approve),
            "reject" => Ok(VoteKind::Reject),
            "abstain" => Ok(VoteKind::Abstain),
            other => Err(format!("Invalid vote type: {}", other)),
        }
    }
}

/// Vote model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vote {
    pub id: Uuid,
    pub decision_id: Uuid,
    pub user_id: Uuid,
    pub vote: VoteKind,
    pub created_at: DateTime<Utc>,
}

/// One voter as shown in a tally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Voter {
    pub user_id: Uuid,
    pub name: String,
    pub vote: VoteKind,
}

/// Aggregated votes on a decision, from the point of view of one caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSummary {
    pub decision_id: Uuid,
    pub approve_count: i64,
    pub reject_count: i64,
    pub abstain_count: i64,

    /// The caller's own vote, if any
    pub user_vote: Option<VoteKind>,

    pub voters: Vec<Voter>,
}

impl VoteSummary {
    /// Tallies a list of voters for the given caller
    pub fn tally(decision_id: Uuid, voters: Vec<Voter>, caller: Uuid) -> Self {
        let mut summary = VoteSummary {
            decision_id,
            ..Default::default()
        };

        for voter in &voters {
            match voter.vote {
                VoteKind::Approve => summary.approve_count += 1,
                VoteKind::Reject => summary.reject_count += 1,
                VoteKind::Abstain => summary.abstain_count += 1,
            }
            if voter.user_id == caller {
                summary.user_vote = Some(voter.vote);
            }
        }

        summary.voters = voters;
        summary
    }
}

impl Vote {
    /// Records `user_id`'s vote, replacing any earlier one
    pub async fn upsert(
        pool: &PgPool,
        decision_id: Uuid,
        user_id: Uuid,
        vote: VoteKind,
    ) -> Result<Self, sqlx::Error> {
        let vote = sqlx::query_as::<_, Vote>(
            r#"
            INSERT INTO votes (decision_id, user_id, vote)
            VALUES ($1, $2, $3)
            ON CONFLICT ON CONSTRAINT votes_decision_id_user_id_key
            DO UPDATE SET vote = EXCLUDED.vote
            RETURNING id, decision_id, user_id, vote, created_at
            "#,
        )
        .bind(decision_id)
        .bind(user_id)
        .bind(vote)
        .fetch_one(pool)
        .await?;

        Ok(vote)
    }

    /// Lists everyone who voted on a decision
    ///
    /// The voter name falls back to the email address when no full name is set.
    pub async fn list_voters(pool: &PgPool, decision_id: Uuid) -> Result<Vec<Voter>, sqlx::Error> {
        let voters = sqlx::query_as::<_, Voter>(
            r#"
            SELECT v.user_id, COALESCE(u.full_name, u.email) AS name, v.vote
            FROM votes v
            JOIN users u ON u.id = v.user_id
            WHERE v.decision_id = $1
            ORDER BY v.created_at ASC
            "#,
        )
        .bind(decision_id)
        .fetch_all(pool)
        .await?;

        Ok(voters)
    }

    /// Builds the vote summary for a decision as seen by `caller`
    pub async fn summary(
        pool: &PgPool,
        decision_id: Uuid,
        caller: Uuid,
    ) -> Result<VoteSummary, sqlx::Error> {
        let voters = Self::list_voters(pool, decision_id).await?;
        Ok(VoteSummary::tally(decision_id, voters, caller))
    }

    /// Removes `user_id`'s vote from a decision
    ///
    /// # Returns
    ///
    /// True if a vote was removed, false if the user hadn't voted
    pub async fn delete(pool: &PgPool, decision_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM votes WHERE decision_id = $1 AND user_id = $2")
            .bind(decision_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voter(user_id: Uuid, vote: VoteKind) -> Voter {
        Voter {
            user_id,
            name: "voter".to_string(),
            vote,
        }
    }

    #[test]
    fn test_tally_counts_and_user_vote() {
        let me = Uuid::new_v4();
        let voters = vec![
            voter(Uuid::new_v4(), VoteKind::Approve),
            voter(me, VoteKind::Reject),
            voter(Uuid::new_v4(), VoteKind::Approve),
            voter(Uuid::new_v4(), VoteKind::Abstain),
        ];

        let summary = VoteSummary::tally(Uuid::new_v4(), voters, me);
        assert_eq!(summary.approve_count, 2);
        assert_eq!(summary.reject_count, 1);
        assert_eq!(summary.abstain_count, 1);
        assert_eq!(summary.user_vote, Some(VoteKind::Reject));
        assert_eq!(summary.voters.len(), 4);
    }

    #[test]
    fn test_tally_without_caller_vote() {
        let summary = VoteSummary::tally(
            Uuid::new_v4(),
            vec![voter(Uuid::new_v4(), VoteKind::Approve)],
            Uuid::new_v4(),
        );
        assert_eq!(summary.user_vote, None);
        assert_eq!(summary.approve_count, 1);
    }

    #[test]
    fn test_empty_summary() {
        let decision_id = Uuid::new_v4();
        let summary = VoteSummary::tally(decision_id, Vec::new(), Uuid::new_v4());
        assert_eq!(summary.decision_id, decision_id);
        assert_eq!(summary.approve_count + summary.reject_count + summary.abstain_count, 0);
        assert!(summary.voters.is_empty());
    }

    #[test]
    fn test_vote_kind_parsing() {
        assert_eq!("Approve".parse::<VoteKind>(), Ok(VoteKind::Approve));
        assert_eq!("abstain".parse::<VoteKind>(), Ok(VoteKind::Abstain));
        assert!("maybe".parse::<VoteKind>().is_err());
        assert_eq!(VoteKind::Reject.to_string(), "reject");
    }
}
