/// Database models for DecisionLog
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts and authentication
/// - `team`: Named groups with invite codes
/// - `team_member`: User-team relationships with roles
/// - `decision`: Logged decisions (personal or team-scoped)
/// - `tag`: Per-user labels and their links to decisions
/// - `comment`: Discussion on a decision
/// - `vote`: Approve/reject/abstain signals, one per voter
/// - `message`: Team chat messages
/// - `whiteboard`: Shared sketches
///
/// # Example
///
/// ```no_run
/// use decisionlog_shared::models::user::{User, CreateUser};
/// use decisionlog_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     full_name: Some("Jane Doe".to_string()),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod comment;
pub mod decision;
pub mod message;
pub mod tag;
pub mod team;
pub mod team_member;
pub mod user;
pub mod vote;
pub mod whiteboard;
