use crate::core::error::ThreadError;
use crate::features::report_threads::clients::UserClient;
use crate::features::report_threads::dtos::{CreateReplyRequest, FlattenedMessage};
use crate::features::report_threads::models::{Report, Role};

use super::reply_policy_service::{can_compose, filter_reply_targets};
use super::thread_resolver_service::ThreadResolver;
use super::thread_view_service::flatten_report;

/// Where the session currently is.
///
/// Write failures never regress a loaded thread to `Errored`; the last good
/// snapshot stays on screen and the failure is carried inline on the compose
/// state instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Loaded,
    Errored(ThreadError),
    Composing,
    Submitting,
}

/// Draft state for the compose form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeState {
    /// Message being answered; `None` means the root report (admins only).
    pub target: Option<i64>,
    pub content: String,
    /// Inline submission error, shown next to the form.
    pub error: Option<ThreadError>,
}

/// Owns one thread's conversation state: the latest `Report` snapshot, the
/// derived flat view and reply targets, and the compose form.
///
/// All derivation is synchronous; the only side effects are the resolver's
/// network calls, awaited sequentially. There is no cancellation API —
/// dropping the session (or an in-flight `load`/`submit` future) discards
/// the pending response, so nothing can touch state after the owner is gone.
pub struct ThreadSession {
    resolver: ThreadResolver,
    report_id: i64,
    role: Role,
    phase: SessionPhase,
    report: Option<Report>,
    messages: Vec<FlattenedMessage>,
    reply_targets: Vec<FlattenedMessage>,
    compose: ComposeState,
    notice: Option<ThreadError>,
}

impl ThreadSession {
    pub fn new(resolver: ThreadResolver, report_id: i64, role: Role) -> Self {
        Self {
            resolver,
            report_id,
            role,
            phase: SessionPhase::Loading,
            report: None,
            messages: Vec::new(),
            reply_targets: Vec::new(),
            compose: ComposeState::default(),
            notice: None,
        }
    }

    /// Resolve the viewer's role once, then construct and load a session.
    ///
    /// A failed role lookup degrades to `Student` instead of aborting: the
    /// resolver's ordered-attempt policy already tolerates a wrong role, so
    /// the worst case is one extra read attempt.
    pub async fn open(resolver: ThreadResolver, users: &UserClient, report_id: i64) -> Self {
        let role = match users.current_role().await {
            Ok(role) => role,
            Err(e) => {
                tracing::warn!("Failed to resolve current user role, assuming student: {}", e);
                Role::Student
            }
        };

        let mut session = Self::new(resolver, report_id, role);
        session.load().await;
        session
    }

    /// Fetch the thread and rebuild the derived view.
    pub async fn load(&mut self) {
        self.phase = SessionPhase::Loading;
        self.notice = None;
        match self.resolver.load_thread(self.report_id, self.role).await {
            Ok(report) => {
                self.apply_report(report);
                self.phase = SessionPhase::Loaded;
            }
            Err(e) => {
                self.phase = SessionPhase::Errored(e);
            }
        }
    }

    /// Replace the snapshot wholesale and recompute the flat view and the
    /// viewer's reply targets. No incremental patching.
    fn apply_report(&mut self, report: Report) {
        self.messages = flatten_report(Some(&report));
        self.reply_targets = filter_reply_targets(&self.messages, self.role);
        self.report = Some(report);
    }

    /// Whether the compose action is enabled at all for this viewer.
    pub fn can_compose(&self) -> bool {
        can_compose(&self.messages, self.role)
    }

    /// Open the compose form against a target message, or against the root
    /// report (`target = None`, admins only). Returns false when the target
    /// is not a legal one for this viewer or the session is mid-flight.
    pub fn begin_compose(&mut self, target: Option<i64>) -> bool {
        if !matches!(self.phase, SessionPhase::Loaded | SessionPhase::Composing) {
            return false;
        }
        if !self.can_compose() {
            return false;
        }
        let legal = match target {
            None => self.role.is_admin(),
            Some(id) => self.reply_targets.iter().any(|m| m.id == id),
        };
        if !legal {
            return false;
        }

        self.phase = SessionPhase::Composing;
        self.compose = ComposeState {
            target,
            content: String::new(),
            error: None,
        };
        true
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        if self.phase == SessionPhase::Composing {
            self.compose.content = content.into();
        }
    }

    pub fn cancel_compose(&mut self) {
        if self.phase == SessionPhase::Composing {
            self.compose = ComposeState::default();
            self.phase = SessionPhase::Loaded;
        }
    }

    /// Submit the draft, then refresh the thread.
    ///
    /// Write failure returns to `Composing` with the draft and an inline
    /// error. Write success followed by a failed refresh keeps the previous
    /// snapshot and sets the softer refresh notice — the reply did land, and
    /// the user must not be nudged into submitting a duplicate.
    pub async fn submit(&mut self) {
        if self.phase != SessionPhase::Composing {
            return;
        }

        let request = CreateReplyRequest {
            report: self.report_id,
            parent_reply: self.compose.target,
            content: self.compose.content.clone(),
        };
        self.phase = SessionPhase::Submitting;

        match self.resolver.submit_reply(&request, self.role).await {
            Ok(()) => {
                self.compose = ComposeState::default();
                self.notice = None;
                match self.resolver.load_thread(self.report_id, self.role).await {
                    Ok(report) => self.apply_report(report),
                    Err(e) => {
                        tracing::warn!("Reply accepted but refresh failed: {}", e);
                        self.notice = Some(ThreadError::RefreshFailed);
                    }
                }
                self.phase = SessionPhase::Loaded;
            }
            Err(e) => {
                // Keep the draft so the user can retry.
                self.compose.error = Some(e);
                self.phase = SessionPhase::Composing;
            }
        }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    /// The flattened conversation, oldest first.
    pub fn messages(&self) -> &[FlattenedMessage] {
        &self.messages
    }

    /// Messages the viewer may reply to.
    pub fn reply_targets(&self) -> &[FlattenedMessage] {
        &self.reply_targets
    }

    pub fn compose(&self) -> &ComposeState {
        &self.compose
    }

    /// Post-submit refresh notice, if the last submit could not refresh.
    pub fn notice(&self) -> Option<&ThreadError> {
        self.notice.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::shared::test_helpers::{
        reply, sample_report, FakeThreadBackend, StubRead, StubThreadSource, StubWrite,
    };

    fn stub_resolver(admin: StubThreadSource, general: StubThreadSource) -> ThreadResolver {
        ThreadResolver::new(Arc::new(admin), Arc::new(general))
    }

    /// Both families backed by the same in-memory thread.
    fn fake_resolver(backend: FakeThreadBackend) -> ThreadResolver {
        let backend = Arc::new(backend);
        ThreadResolver::new(backend.clone(), backend)
    }

    fn report_with_admin_reply() -> Report {
        let mut report = sample_report();
        report.top_level_replies = vec![reply(
            2,
            "admin1",
            true,
            "2023-01-02T00:00:00Z",
            Vec::new(),
        )];
        report
    }

    #[tokio::test]
    async fn test_load_success_builds_view() {
        let resolver = stub_resolver(
            StubThreadSource::reading("admin", StubRead::Forbidden),
            StubThreadSource::reading("general", StubRead::Ok(report_with_admin_reply())),
        );
        let mut session = ThreadSession::new(resolver, 1, Role::Student);
        session.load().await;

        assert_eq!(*session.phase(), SessionPhase::Loaded);
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.reply_targets().len(), 1);
        assert!(session.can_compose());
        assert!(session.report().is_some());
    }

    #[tokio::test]
    async fn test_load_failure_enters_errored() {
        let resolver = stub_resolver(
            StubThreadSource::reading("admin", StubRead::Forbidden),
            StubThreadSource::reading("general", StubRead::Forbidden),
        );
        let mut session = ThreadSession::new(resolver, 1, Role::Student);
        session.load().await;

        assert_eq!(
            *session.phase(),
            SessionPhase::Errored(ThreadError::PermissionDenied)
        );
        assert!(session.report().is_none());
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_student_compose_gating() {
        let resolver = stub_resolver(
            StubThreadSource::reading("admin", StubRead::Forbidden),
            StubThreadSource::reading("general", StubRead::Ok(sample_report())),
        );
        let mut session = ThreadSession::new(resolver, 1, Role::Student);
        session.load().await;

        // No admin reply yet: the compose action stays disabled.
        assert!(!session.can_compose());
        assert!(!session.begin_compose(Some(1)));
        assert!(!session.begin_compose(None));
        assert_eq!(*session.phase(), SessionPhase::Loaded);
    }

    #[tokio::test]
    async fn test_compose_target_rules() {
        let resolver = stub_resolver(
            StubThreadSource::reading("admin", StubRead::Forbidden),
            StubThreadSource::reading("general", StubRead::Ok(report_with_admin_reply())),
        );
        let mut session = ThreadSession::new(resolver, 1, Role::Student);
        session.load().await;

        // Students may answer the admin reply, but not the original report
        // and never the root directly.
        assert!(!session.begin_compose(Some(1)));
        assert!(!session.begin_compose(None));
        assert!(session.begin_compose(Some(2)));
        assert_eq!(*session.phase(), SessionPhase::Composing);

        session.cancel_compose();
        assert_eq!(*session.phase(), SessionPhase::Loaded);
        assert_eq!(*session.compose(), ComposeState::default());
    }

    #[tokio::test]
    async fn test_admin_root_reply_appears_after_refresh() {
        let resolver = fake_resolver(FakeThreadBackend::new("admin", sample_report(), true));
        let mut session = ThreadSession::new(resolver, 1, Role::Admin);
        session.load().await;
        assert_eq!(session.messages().len(), 1);

        assert!(session.begin_compose(None));
        session.set_content("On it.");
        session.submit().await;

        assert_eq!(*session.phase(), SessionPhase::Loaded);
        assert_eq!(session.messages().len(), 2);
        let new_reply = session
            .messages()
            .iter()
            .find(|m| !m.is_original)
            .unwrap();
        assert_eq!(new_reply.level, 1);
        assert_eq!(new_reply.content, "On it.");
        assert!(session.notice().is_none());
        assert_eq!(*session.compose(), ComposeState::default());
    }

    #[tokio::test]
    async fn test_student_reply_nests_under_admin_target() {
        let resolver = fake_resolver(FakeThreadBackend::new(
            "general",
            report_with_admin_reply(),
            false,
        ));
        let mut session = ThreadSession::new(resolver, 1, Role::Student);
        session.load().await;

        assert!(session.begin_compose(Some(2)));
        session.set_content("Thanks, still broken though.");
        session.submit().await;

        assert_eq!(*session.phase(), SessionPhase::Loaded);
        assert_eq!(session.messages().len(), 3);
        let nested = session
            .messages()
            .iter()
            .find(|m| m.content == "Thanks, still broken though.")
            .unwrap();
        assert_eq!(nested.level, 2);
        assert!(!nested.is_admin);
    }

    #[tokio::test]
    async fn test_write_failure_keeps_draft() {
        let resolver = stub_resolver(
            StubThreadSource::new(
                "admin",
                vec![StubRead::Ok(sample_report())],
                StubWrite::Rejected(Some("Thread is locked")),
            ),
            StubThreadSource::new(
                "general",
                vec![StubRead::Ok(sample_report())],
                StubWrite::Rejected(None),
            ),
        );
        let mut session = ThreadSession::new(resolver, 1, Role::Admin);
        session.load().await;

        assert!(session.begin_compose(None));
        session.set_content("draft to keep");
        session.submit().await;

        assert_eq!(*session.phase(), SessionPhase::Composing);
        assert_eq!(session.compose().content, "draft to keep");
        assert_eq!(session.compose().target, None);
        assert!(matches!(
            session.compose().error,
            Some(ThreadError::SubmissionFailed(_))
        ));
        // The loaded thread is still on screen.
        assert_eq!(session.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_after_submit_sets_soft_notice() {
        // First read succeeds, every later read is rejected on both families.
        let resolver = stub_resolver(
            StubThreadSource::new(
                "admin",
                vec![StubRead::Ok(sample_report()), StubRead::Forbidden],
                StubWrite::Ok,
            ),
            StubThreadSource::reading("general", StubRead::Forbidden),
        );
        let mut session = ThreadSession::new(resolver, 1, Role::Admin);
        session.load().await;

        assert!(session.begin_compose(None));
        session.set_content("On it.");
        session.submit().await;

        assert_eq!(*session.phase(), SessionPhase::Loaded);
        assert_eq!(session.notice(), Some(&ThreadError::RefreshFailed));
        // Previous snapshot retained, compose reset despite the failed refresh.
        assert_eq!(session.messages().len(), 1);
        assert_eq!(*session.compose(), ComposeState::default());
    }

    #[tokio::test]
    async fn test_submit_ignored_outside_composing() {
        let resolver = stub_resolver(
            StubThreadSource::reading("admin", StubRead::Ok(sample_report())),
            StubThreadSource::reading("general", StubRead::Ok(sample_report())),
        );
        let mut session = ThreadSession::new(resolver, 1, Role::Admin);
        session.load().await;

        session.submit().await;
        assert_eq!(*session.phase(), SessionPhase::Loaded);
    }
}
