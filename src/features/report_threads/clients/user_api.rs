use std::sync::Arc;

use crate::core::config::ApiConfig;
use crate::core::error::{AppError, Result};
use crate::features::report_threads::dtos::CurrentUserDto;
use crate::features::report_threads::models::Role;
use crate::shared::types::Envelope;

use super::thread_api::check_status;

/// Client for the current-user endpoint. The session resolves the viewer's
/// role exactly once per thread load through this client.
pub struct UserClient {
    http: reqwest::Client,
    config: Arc<ApiConfig>,
}

impl UserClient {
    pub fn new(config: Arc<ApiConfig>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub async fn current_role(&self) -> Result<Role> {
        let url = format!("{}/user/current", self.config.base_url);
        tracing::debug!("Fetching current user: {}", url);

        let mut request = self.http.get(&url);
        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Failed to fetch current user: {}", e);
            AppError::Transport(format!("Failed to fetch current user: {}", e))
        })?;

        let response = check_status(response).await?;

        let envelope = response
            .json::<Envelope<CurrentUserDto>>()
            .await
            .map_err(|e| {
                tracing::error!("Failed to parse current user response: {}", e);
                AppError::Decode(format!("Failed to parse current user response: {}", e))
            })?;

        Ok(Role::from(envelope.data))
    }
}
