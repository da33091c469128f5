use std::sync::Arc;

use async_trait::async_trait;

use crate::core::config::ApiConfig;
use crate::core::error::{AppError, Result};
use crate::features::report_threads::dtos::CreateReplyRequest;
use crate::features::report_threads::models::Report;
use crate::shared::types::{Envelope, ErrorBody};

/// One of the two backend resource families for a report thread.
///
/// The backend exposes an admin-scoped family and a general-access family
/// for the same logical thread because authorization differs per role. Both
/// sit behind this capability so the resolver can try them in order without
/// caring which is which.
#[async_trait]
pub trait ThreadSource: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    async fn read(&self, report_id: i64) -> Result<Report>;

    async fn write(&self, reply: &CreateReplyRequest) -> Result<()>;
}

/// Shared HTTP plumbing for both endpoint families.
#[derive(Clone)]
pub struct ThreadApi {
    http: reqwest::Client,
    config: Arc<ApiConfig>,
}

impl ThreadApi {
    pub fn new(config: Arc<ApiConfig>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn get_report(&self, path: &str) -> Result<Report> {
        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!("Fetching report thread: {}", url);

        let mut request = self.http.get(&url);
        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Failed to fetch report thread: {}", e);
            AppError::Transport(format!("Failed to fetch report thread: {}", e))
        })?;

        let response = check_status(response).await?;

        let envelope = response.json::<Envelope<Report>>().await.map_err(|e| {
            tracing::error!("Failed to parse report thread response: {}", e);
            AppError::Decode(format!("Failed to parse report thread response: {}", e))
        })?;

        Ok(envelope.data)
    }

    async fn post_reply(&self, path: &str, reply: &CreateReplyRequest) -> Result<()> {
        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!("Submitting reply: {}", url);

        let mut request = self.http.post(&url).json(reply);
        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Failed to submit reply: {}", e);
            AppError::Transport(format!("Failed to submit reply: {}", e))
        })?;

        check_status(response).await?;

        Ok(())
    }
}

/// Map a non-2xx response to `AppError::Api`, pulling the `{error}` text out
/// of the body when the backend supplied one.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.error);
    tracing::warn!(
        "API error: HTTP {} - {}",
        status,
        message.as_deref().unwrap_or(&body)
    );

    Err(AppError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Admin-scoped endpoint family.
pub struct AdminThreadClient {
    api: ThreadApi,
}

impl AdminThreadClient {
    pub fn new(api: ThreadApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ThreadSource for AdminThreadClient {
    fn name(&self) -> &'static str {
        "admin"
    }

    async fn read(&self, report_id: i64) -> Result<Report> {
        self.api
            .get_report(&format!("/admin/report-threads/{}", report_id))
            .await
    }

    async fn write(&self, reply: &CreateReplyRequest) -> Result<()> {
        self.api.post_reply("/admin/report-replies", reply).await
    }
}

/// General-access endpoint family.
pub struct GeneralThreadClient {
    api: ThreadApi,
}

impl GeneralThreadClient {
    pub fn new(api: ThreadApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ThreadSource for GeneralThreadClient {
    fn name(&self) -> &'static str {
        "general"
    }

    async fn read(&self, report_id: i64) -> Result<Report> {
        self.api
            .get_report(&format!("/report-threads/{}", report_id))
            .await
    }

    async fn write(&self, reply: &CreateReplyRequest) -> Result<()> {
        self.api.post_reply("/report-replies", reply).await
    }
}
