/// Team membership model and database operations
///
/// This module provides the TeamMember model for user-team relationships with roles.
/// It implements the many-to-many relationship between users and teams; the role on
/// each row decides what the member may do to the team and its shared resources.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE team_role AS ENUM ('owner', 'admin', 'member');
///
/// CREATE TABLE team_members (
///     team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role team_role NOT NULL DEFAULT 'member',
///     joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (team_id, user_id)
/// );
/// ```
///
/// # Roles
///
/// - **owner**: Full control, delete team, change roles
/// - **admin**: Rename team, remove members
/// - **member**: Read and write shared decisions, chat, whiteboards
///
/// # Example
///
/// ```no_run
/// use decisionlog_shared::models::team_member::{TeamMember, CreateTeamMember, TeamRole};
/// use decisionlog_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let team_id = Uuid::new_v4();
/// let user_id = Uuid::new_v4();
///
/// TeamMember::create(&pool, CreateTeamMember {
///     team_id,
///     user_id,
///     role: TeamRole::Member,
/// }).await?;
///
/// let is_member = TeamMember::is_member(&pool, team_id, user_id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Roles a user can hold inside a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "team_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    /// Created the team; can delete it and change roles
    Owner,

    /// Can edit the team and remove members
    Admin,

    /// Regular participant
    Member,
}

impl TeamRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamRole::Owner => "owner",
            TeamRole::Admin => "admin",
            TeamRole::Member => "member",
        }
    }

    /// Can rename the team and remove other members
    pub fn can_manage_team(&self) -> bool {
        matches!(self, TeamRole::Owner | TeamRole::Admin)
    }

    /// Can delete the team and change member roles
    pub fn can_delete_team(&self) -> bool {
        matches!(self, TeamRole::Owner)
    }

    /// Checks if this role has the permission level of the required role
    ///
    /// Hierarchy: Owner > Admin > Member
    pub fn has_permission(&self, required: &TeamRole) -> bool {
        self.permission_level() >= required.permission_level()
    }

    fn permission_level(&self) -> u8 {
        match self {
            TeamRole::Owner => 3,
            TeamRole::Admin => 2,
            TeamRole::Member => 1,
        }
    }
}

impl fmt::Display for TeamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TeamRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "owner" => Ok(TeamRole::Owner),
            "admin" => Ok(TeamRole::Admin),
            "member" => Ok(TeamRole::Member),
            other => Err(format!("Invalid team role: {}", other)),
        }
    }
}

/// Membership row linking a user to a team
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamMember {
    /// Team ID
    pub team_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the team
    pub role: TeamRole,

    /// When the user joined
    pub joined_at: DateTime<Utc>,
}

/// Membership joined with the member's public profile
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamMemberDetail {
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role: TeamRole,
    pub joined_at: DateTime<Utc>,
    pub email: String,
    pub full_name: Option<String>,
}

/// Input for creating a new membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeamMember {
    /// Team ID
    pub team_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role to assign (defaults to Member)
    #[serde(default = "default_role")]
    pub role: TeamRole,
}

fn default_role() -> TeamRole {
    TeamRole::Member
}

impl TeamMember {
    /// Adds a user to a team
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Membership already exists (primary key violation)
    /// - Team or user doesn't exist (foreign key violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateTeamMember) -> Result<Self, sqlx::Error> {
        let member = sqlx::query_as::<_, TeamMember>(
            r#"
            INSERT INTO team_members (team_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING team_id, user_id, role, joined_at
            "#,
        )
        .bind(data.team_id)
        .bind(data.user_id)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(member)
    }

    /// Finds a specific membership by team and user
    pub async fn find(
        pool: &PgPool,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let member = sqlx::query_as::<_, TeamMember>(
            r#"
            SELECT team_id, user_id, role, joined_at
            FROM team_members
            WHERE team_id = $1 AND user_id = $2
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(member)
    }

    /// Checks if a user belongs to a team (any role)
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use decisionlog_shared::models::team_member::TeamMember;
    /// # use sqlx::PgPool;
    /// # use uuid::Uuid;
    /// # async fn example(pool: PgPool, team_id: Uuid, user_id: Uuid) -> Result<(), sqlx::Error> {
    /// if TeamMember::is_member(&pool, team_id, user_id).await? {
    ///     println!("User is on the team");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn is_member(
        pool: &PgPool,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM team_members
                WHERE team_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Gets a user's role in a team
    ///
    /// # Returns
    ///
    /// The user's role if they are a member, None otherwise
    pub async fn get_role(
        pool: &PgPool,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<TeamRole>, sqlx::Error> {
        let role: Option<TeamRole> = sqlx::query_scalar(
            r#"
            SELECT role FROM team_members
            WHERE team_id = $1 AND user_id = $2
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(role)
    }

    /// Updates a user's role in a team
    ///
    /// # Returns
    ///
    /// The updated membership, or None if the membership doesn't exist
    pub async fn update_role(
        pool: &PgPool,
        team_id: Uuid,
        user_id: Uuid,
        role: TeamRole,
    ) -> Result<Option<Self>, sqlx::Error> {
        let member = sqlx::query_as::<_, TeamMember>(
            r#"
            UPDATE team_members
            SET role = $3
            WHERE team_id = $1 AND user_id = $2
            RETURNING team_id, user_id, role, joined_at
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .bind(role)
        .fetch_optional(pool)
        .await?;

        Ok(member)
    }

    /// Removes a user from a team
    ///
    /// # Returns
    ///
    /// True if the membership was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, team_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = $2")
            .bind(team_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all members of a team with their profiles, oldest first
    pub async fn list_by_team(
        pool: &PgPool,
        team_id: Uuid,
    ) -> Result<Vec<TeamMemberDetail>, sqlx::Error> {
        let members = sqlx::query_as::<_, TeamMemberDetail>(
            r#"
            SELECT tm.team_id, tm.user_id, tm.role, tm.joined_at, u.email, u.full_name
            FROM team_members tm
            JOIN users u ON u.id = tm.user_id
            WHERE tm.team_id = $1
            ORDER BY tm.joined_at ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_role_as_str() {
        assert_eq!(TeamRole::Owner.as_str(), "owner");
        assert_eq!(TeamRole::Admin.as_str(), "admin");
        assert_eq!(TeamRole::Member.as_str(), "member");
    }

    #[test]
    fn test_role_permissions() {
        assert!(TeamRole::Owner.can_manage_team());
        assert!(TeamRole::Owner.can_delete_team());

        assert!(TeamRole::Admin.can_manage_team());
        assert!(!TeamRole::Admin.can_delete_team());

        assert!(!TeamRole::Member.can_manage_team());
        assert!(!TeamRole::Member.can_delete_team());
    }

    #[test]
    fn test_role_hierarchy() {
        assert!(TeamRole::Owner.has_permission(&TeamRole::Admin));
        assert!(TeamRole::Admin.has_permission(&TeamRole::Admin));
        assert!(TeamRole::Admin.has_permission(&TeamRole::Member));
        assert!(!TeamRole::Member.has_permission(&TeamRole::Admin));
        assert!(!TeamRole::Admin.has_permission(&TeamRole::Owner));
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("ADMIN".parse::<TeamRole>(), Ok(TeamRole::Admin));
        assert_eq!("member".parse::<TeamRole>(), Ok(TeamRole::Member));
        assert!("viewer".parse::<TeamRole>().is_err());
    }

    #[test]
    fn test_create_member_default_role() {
        let data: CreateTeamMember = serde_json::from_value(serde_json::json!({
            "team_id": Uuid::new_v4(),
            "user_id": Uuid::new_v4(),
        }))
        .unwrap();
        assert_eq!(data.role, TeamRole::Member);
    }
}
