use crate::features::report_threads::dtos::FlattenedMessage;
use crate::features::report_threads::models::{Reply, Report};

/// Flatten a report and its reply tree into one chronological conversation.
///
/// The report itself becomes the first message (`is_original`, level 0);
/// every reply becomes a `RE:`-prefixed message at its parent's level + 1.
/// The result is sorted ascending by timestamp, ties keeping input order.
/// Pure: fresh output on every call, input untouched.
pub fn flatten_report(report: Option<&Report>) -> Vec<FlattenedMessage> {
    let Some(report) = report else {
        return Vec::new();
    };

    let mut messages = Vec::with_capacity(1 + report.reply_count());
    messages.push(FlattenedMessage {
        id: report.id,
        subject: report.subject.clone(),
        content: report.details.clone(),
        sender: report.from_student_username.clone(),
        timestamp: report.requested_at,
        is_admin: false,
        is_original: true,
        level: 0,
    });
    collect_replies(&report.top_level_replies, &report.subject, 1, &mut messages);

    // sort_by_key is stable, so equal timestamps keep walk order
    messages.sort_by_key(|m| m.timestamp);
    messages
}

fn collect_replies(
    replies: &[Reply],
    subject: &str,
    level: u32,
    out: &mut Vec<FlattenedMessage>,
) {
    for reply in replies {
        out.push(FlattenedMessage {
            id: reply.id,
            subject: format!("RE: {}", subject),
            content: reply.content.clone(),
            sender: reply.replied_by_username.clone(),
            timestamp: reply.created_at,
            is_admin: reply.is_admin_reply,
            is_original: false,
            level,
        });
        collect_replies(&reply.child_replies, subject, level + 1, out);
    }
}
