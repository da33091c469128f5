use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::features::report_threads::models::Role;

/// A single entry in the flattened conversation view.
///
/// Derived from a `Report` on every refresh and handed to the rendering
/// layer as-is; never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedMessage {
    pub id: i64,
    pub subject: String,
    pub content: String,
    pub sender: String,
    pub timestamp: DateTime<Utc>,
    pub is_admin: bool,
    pub is_original: bool,
    /// Nesting depth. 0 = the original report.
    pub level: u32,
}

/// Request body for posting a reply.
///
/// `parent_reply = None` addresses the root report directly and is only
/// issued for admins.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReplyRequest {
    pub report: i64,
    pub parent_reply: Option<i64>,
    pub content: String,
}

/// Shape of `GET /user/current`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserDto {
    pub is_admin: bool,
    #[serde(default)]
    pub is_president: bool,
}

impl From<CurrentUserDto> for Role {
    fn from(user: CurrentUserDto) -> Self {
        if user.is_admin {
            Role::Admin
        } else if user.is_president {
            Role::President
        } else {
            Role::Student
        }
    }
}
