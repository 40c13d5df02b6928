/// Authorization policy
///
/// Every resource-scoped request goes through one check: given the caller, a
/// reference to the resource (its kind, owner and team) and the relation the
/// caller must have to it, allow or deny.
///
/// # Relations
///
/// - [`Relation::Owner`]: the caller created the resource
/// - [`Relation::TeamRole`]: the caller holds at least the given role in the
///   resource's team (owner > admin > member)
/// - [`Relation::OwnerOrMember`]: the caller owns the resource, or the resource
///   belongs to a team the caller is a member of
///
/// [`evaluate`] is the pure decision given the caller's team role;
/// [`authorize`] loads that role from the database first.
///
/// # Example
///
/// ```no_run
/// use decisionlog_shared::auth::authorization::{authorize, Relation, Resource};
/// use decisionlog_shared::auth::middleware::AuthContext;
/// use decisionlog_shared::models::decision::Decision;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, auth: AuthContext, decision: Decision) -> Result<(), Box<dyn std::error::Error>> {
/// // Only the author may edit
/// authorize(&pool, &auth, &decision.resource_ref(), Relation::Owner).await?;
///
/// // Author or teammates may read
/// authorize(&pool, &auth, &decision.resource_ref(), Relation::OwnerOrMember).await?;
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use uuid::Uuid;

use super::middleware::AuthContext;
use crate::models::{
    comment::Comment,
    decision::Decision,
    tag::Tag,
    team::Team,
    team_member::{TeamMember, TeamRole},
    whiteboard::Whiteboard,
};

/// Authorization errors; all of them surface as 403 Forbidden
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    #[error("Not a member of team {0}")]
    NotMember(Uuid),

    #[error("Insufficient permissions: requires {required}, has {actual}")]
    InsufficientRole { required: TeamRole, actual: TeamRole },

    #[error("Not authorized to access this resource")]
    NotAuthorized,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Kinds of resources the policy knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Decision,
    Tag,
    Comment,
    Team,
    Whiteboard,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Decision => "decision",
            ResourceKind::Tag => "tag",
            ResourceKind::Comment => "comment",
            ResourceKind::Team => "team",
            ResourceKind::Whiteboard => "whiteboard",
        };
        f.write_str(name)
    }
}

/// What the policy needs to know about a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub id: Uuid,

    /// Creator, for personal resources
    pub owner_id: Option<Uuid>,

    /// Team the resource is shared with
    pub team_id: Option<Uuid>,
}

impl ResourceRef {
    /// Reference to a team itself (no owner; the team is its own scope)
    pub fn team(team_id: Uuid) -> Self {
        Self {
            kind: ResourceKind::Team,
            id: team_id,
            owner_id: None,
            team_id: Some(team_id),
        }
    }
}

/// Relation the caller must hold to a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Owner,
    TeamRole(TeamRole),
    OwnerOrMember,
}

/// Anything that can be checked by the policy
pub trait Resource {
    fn resource_ref(&self) -> ResourceRef;
}

impl Resource for Decision {
    fn resource_ref(&self) -> ResourceRef {
        ResourceRef {
            kind: ResourceKind::Decision,
            id: self.id,
            owner_id: Some(self.user_id),
            team_id: self.team_id,
        }
    }
}

impl Resource for Tag {
    fn resource_ref(&self) -> ResourceRef {
        ResourceRef {
            kind: ResourceKind::Tag,
            id: self.id,
            owner_id: Some(self.user_id),
            team_id: None,
        }
    }
}

impl Resource for Comment {
    fn resource_ref(&self) -> ResourceRef {
        ResourceRef {
            kind: ResourceKind::Comment,
            id: self.id,
            owner_id: Some(self.user_id),
            team_id: None,
        }
    }
}

impl Resource for Whiteboard {
    fn resource_ref(&self) -> ResourceRef {
        ResourceRef {
            kind: ResourceKind::Whiteboard,
            id: self.id,
            owner_id: Some(self.user_id),
            team_id: self.team_id,
        }
    }
}

impl Resource for Team {
    fn resource_ref(&self) -> ResourceRef {
        ResourceRef::team(self.id)
    }
}

/// Decides whether `auth` holds `relation` to `resource`
///
/// `role` is the caller's role in `resource.team_id`, or None if the caller is
/// not a member (or the resource has no team).
pub fn evaluate(
    auth: &AuthContext,
    resource: &ResourceRef,
    relation: Relation,
    role: Option<TeamRole>,
) -> Result<(), AuthzError> {
    let is_owner = resource.owner_id == Some(auth.user_id);

    match relation {
        Relation::Owner => {
            if is_owner {
                Ok(())
            } else {
                Err(AuthzError::NotAuthorized)
            }
        }
        Relation::TeamRole(required) => {
            let team_id = resource.team_id.ok_or(AuthzError::NotAuthorized)?;
            let actual = role.ok_or(AuthzError::NotMember(team_id))?;

            if !actual.has_permission(&required) {
                return Err(AuthzError::InsufficientRole { required, actual });
            }
            Ok(())
        }
        Relation::OwnerOrMember => {
            if is_owner {
                return Ok(());
            }
            match resource.team_id {
                Some(team_id) if role.is_none() => Err(AuthzError::NotMember(team_id)),
                Some(_) => Ok(()),
                None => Err(AuthzError::NotAuthorized),
            }
        }
    }
}

/// Loads the caller's team role when needed and applies [`evaluate`]
pub async fn authorize(
    pool: &PgPool,
    auth: &AuthContext,
    resource: &ResourceRef,
    relation: Relation,
) -> Result<(), AuthzError> {
    let needs_role = match relation {
        Relation::Owner => false,
        Relation::TeamRole(_) => true,
        Relation::OwnerOrMember => resource.owner_id != Some(auth.user_id),
    };

    let role = match (needs_role, resource.team_id) {
        (true, Some(team_id)) => TeamMember::get_role(pool, team_id, auth.user_id).await?,
        _ => None,
    };

    let result = evaluate(auth, resource, relation, role);

    if let Err(ref err) = result {
        tracing::debug!(
            user_id = %auth.user_id,
            kind = %resource.kind,
            resource_id = %resource.id,
            error = %err,
            "Access denied"
        );
    }

    result
}

/// Requires `user_id` to be a member of `team_id`, returning their role
pub async fn require_membership(
    pool: &PgPool,
    team_id: Uuid,
    user_id: Uuid,
) -> Result<TeamRole, AuthzError> {
    TeamMember::get_role(pool, team_id, user_id)
        .await?
        .ok_or(AuthzError::NotMember(team_id))
}
