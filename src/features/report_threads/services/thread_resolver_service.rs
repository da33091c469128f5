use std::sync::Arc;

use crate::core::config::ApiConfig;
use crate::core::error::{AppError, ThreadError};
use crate::features::report_threads::clients::{
    AdminThreadClient, GeneralThreadClient, ThreadApi, ThreadSource,
};
use crate::features::report_threads::dtos::CreateReplyRequest;
use crate::features::report_threads::models::{Report, Role};

const SUBMIT_FAILED_MESSAGE: &str = "Failed to submit reply, please try again.";

/// Reads and writes a thread against the two endpoint families, preferring
/// the family matching the viewer's role and falling back to the other.
///
/// Role alone is not trusted to pick the right family: a stale role lookup
/// or a permission change mid-session would otherwise turn into a hard
/// failure instead of one wasted attempt.
pub struct ThreadResolver {
    admin: Arc<dyn ThreadSource>,
    general: Arc<dyn ThreadSource>,
}

impl ThreadResolver {
    pub fn new(admin: Arc<dyn ThreadSource>, general: Arc<dyn ThreadSource>) -> Self {
        Self { admin, general }
    }

    /// Resolver wired to the real backend endpoint families.
    pub fn from_config(config: Arc<ApiConfig>) -> Self {
        let api = ThreadApi::new(config);
        Self::new(
            Arc::new(AdminThreadClient::new(api.clone())),
            Arc::new(GeneralThreadClient::new(api)),
        )
    }

    fn ordered(&self, role: Role) -> [&dyn ThreadSource; 2] {
        if role.is_admin() {
            [self.admin.as_ref(), self.general.as_ref()]
        } else {
            [self.general.as_ref(), self.admin.as_ref()]
        }
    }

    /// Load the thread, trying the role-preferred family first.
    ///
    /// Success on either attempt short-circuits; a first-attempt error is
    /// expected role-mismatch noise and is only logged at debug.
    pub async fn load_thread(&self, report_id: i64, role: Role) -> Result<Report, ThreadError> {
        let [first, second] = self.ordered(role);

        let first_err = match first.read(report_id).await {
            Ok(report) => return Ok(report),
            Err(e) => e,
        };
        tracing::debug!(
            "{} thread read failed, falling back to {}: {}",
            first.name(),
            second.name(),
            first_err
        );

        let second_err = match second.read(report_id).await {
            Ok(report) => return Ok(report),
            Err(e) => e,
        };
        tracing::warn!(
            "Both thread reads failed for report {}: {} / {}",
            report_id,
            first_err,
            second_err
        );

        Err(classify_read_failure(&first_err, &second_err))
    }

    /// Submit a reply, same role-preferred order and single fallback.
    ///
    /// The caller refreshes afterwards via `load_thread`, which deliberately
    /// re-runs the role-preferred order rather than mirroring whichever
    /// family accepted the write.
    pub async fn submit_reply(
        &self,
        request: &CreateReplyRequest,
        role: Role,
    ) -> Result<(), ThreadError> {
        let [first, second] = self.ordered(role);

        let first_err = match first.write(request).await {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };
        tracing::debug!(
            "{} reply write failed, falling back to {}: {}",
            first.name(),
            second.name(),
            first_err
        );

        let second_err = match second.write(request).await {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };
        tracing::warn!(
            "Both reply writes failed for report {}: {} / {}",
            request.report,
            first_err,
            second_err
        );

        Err(ThreadError::SubmissionFailed(submission_message(
            &second_err,
            &first_err,
        )))
    }
}

/// Both reads failed. Only a 403 from both families means the viewer
/// genuinely lacks access; any other combination is treated as transient.
fn classify_read_failure(first: &AppError, second: &AppError) -> ThreadError {
    if first.is_forbidden() && second.is_forbidden() {
        ThreadError::PermissionDenied
    } else {
        ThreadError::FetchFailed
    }
}

/// Prefer a backend-supplied message, final attempt first.
fn submission_message(last: &AppError, first: &AppError) -> String {
    last.server_message()
        .or_else(|| first.server_message())
        .unwrap_or(SUBMIT_FAILED_MESSAGE)
        .to_string()
}
