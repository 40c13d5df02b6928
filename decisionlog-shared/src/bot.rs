/// Keyword assistant over a user's decision log
///
/// The assistant answers a handful of questions by matching keywords in the
/// query against fixed rules. Rules are checked in order and the first match
/// wins. Matching is case-insensitive and works on substrings.
///
/// # Example
///
/// ```
/// use decisionlog_shared::bot::answer;
///
/// let reply = answer("How many decisions have I made?", &[]);
/// assert_eq!(reply.answer, "You have logged a total of 0 decisions so far.");
/// assert!(reply.sources.is_none());
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::decision::{Decision, DecisionOutcome, DecisionStatus};

/// Maximum number of decisions cited in one answer
pub const MAX_SOURCES: usize = 3;

const HELP_TEXT: &str = "I can help you track your decisions! Try asking 'How many decisions have I made?' or 'Show me my successful decisions'.";

/// A decision cited by the assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotSource {
    pub id: Uuid,
    pub title: String,
}

/// Assistant reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotAnswer {
    pub answer: String,

    /// Decisions the answer refers to; omitted for plain answers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<BotSource>>,
}

impl BotAnswer {
    fn plain(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: None,
        }
    }

    fn cited<'a>(answer: impl Into<String>, decisions: impl Iterator<Item = &'a Decision>) -> Self {
        let sources = decisions
            .take(MAX_SOURCES)
            .map(|d| BotSource {
                id: d.id,
                title: d.title.clone(),
            })
            .collect();

        Self {
            answer: answer.into(),
            sources: Some(sources),
        }
    }
}

fn mentions(query: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| query.contains(k))
}

/// Answers `query` from the caller's decisions
///
/// `decisions` is expected newest first, as returned by
/// [`Decision::list_by_user`]; cited sources keep that order.
pub fn answer(query: &str, decisions: &[Decision]) -> BotAnswer {
    let query = query.to_lowercase();

    if mentions(&query, &["how many decisions", "total decisions"]) {
        return BotAnswer::plain(format!(
            "You have logged a total of {} decisions so far.",
            decisions.len()
        ));
    }

    if mentions(&query, &["successful", "success"]) {
        let successful: Vec<&Decision> = decisions
            .iter()
            .filter(|d| d.outcome == DecisionOutcome::Success)
            .collect();

        return BotAnswer::cited(
            format!("You have {} decisions marked as successful.", successful.len()),
            successful.into_iter(),
        );
    }

    if mentions(&query, &["pending", "open"]) {
        let pending: Vec<&Decision> = decisions
            .iter()
            .filter(|d| d.status == DecisionStatus::Pending)
            .collect();

        return BotAnswer::cited(
            format!("You have {} pending decisions waiting for review.", pending.len()),
            pending.into_iter(),
        );
    }

    if mentions(&query, &["recent", "latest"]) {
        return BotAnswer::cited("Here are your most recent decisions:", decisions.iter());
    }

    BotAnswer::plain(HELP_TEXT)
}
