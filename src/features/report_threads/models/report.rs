use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A report raised by a student, with its full reply tree.
///
/// Immutable once created: the client only ever reads it or appends to it
/// indirectly by submitting a reply and re-fetching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: i64,
    pub subject: String,
    /// Body of the original message.
    pub details: String,
    pub report_type: String,
    pub requested_at: DateTime<Utc>,
    pub from_student_username: String,
    #[serde(default)]
    pub top_level_replies: Vec<Reply>,
}

/// A reply in the thread. Each node exclusively owns its children, so the
/// tree is acyclic by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub replied_by_username: String,
    pub is_admin_reply: bool,
    #[serde(default)]
    pub child_replies: Vec<Reply>,
}

impl Report {
    /// Total number of replies in the tree, at any depth.
    pub fn reply_count(&self) -> usize {
        fn count(replies: &[Reply]) -> usize {
            replies.iter().map(|r| 1 + count(&r.child_replies)).sum()
        }
        count(&self.top_level_replies)
    }
}
