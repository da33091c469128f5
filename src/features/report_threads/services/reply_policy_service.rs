use crate::features::report_threads::dtos::FlattenedMessage;
use crate::features::report_threads::models::Role;

/// Messages the viewer may reply to.
///
/// Admins may target anything, including the original report. Presidents and
/// students may only target admin-authored replies, which rules out both
/// peer-to-peer side threads and reopening the root report directly.
pub fn filter_reply_targets(messages: &[FlattenedMessage], role: Role) -> Vec<FlattenedMessage> {
    match role {
        Role::Admin => messages.to_vec(),
        Role::President | Role::Student => messages
            .iter()
            .filter(|m| m.is_admin && !m.is_original)
            .cloned()
            .collect(),
    }
}

/// Whether the compose action is available at all for this viewer.
///
/// Non-admins need at least one admin reply to answer to; re-evaluated after
/// every successful refresh since a new admin reply may unlock composition.
pub fn can_compose(messages: &[FlattenedMessage], role: Role) -> bool {
    role.is_admin() || messages.iter().any(|m| m.is_admin && !m.is_original)
}
