/// API route handlers
///
/// One module per resource:
///
/// - `health`: Liveness and database status
/// - `auth`: Registration, login, token refresh and the caller's profile
/// - `decisions`, `tags`, `comments`, `votes`: The decision log
/// - `teams`: Teams, invite codes and memberships
/// - `chat`: Team message history
/// - `whiteboards`: Personal and team whiteboards
/// - `bot`: Keyword questions about the caller's decisions

pub mod auth;
pub mod bot;
pub mod chat;
pub mod comments;
pub mod decisions;
pub mod health;
pub mod tags;
pub mod teams;
pub mod votes;
pub mod whiteboards;

use serde::{Deserialize, Deserializer};

/// Distinguishes an explicit `null` from an absent field
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`: absent
/// stays `None` (leave unchanged), `null` becomes `Some(None)` (clear).
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
