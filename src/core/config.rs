use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
}

/// Connection settings for the society management backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the REST API, without a trailing slash.
    pub base_url: String,
    /// Opaque session token attached as a bearer header when present.
    /// Issuance and decoding happen elsewhere; this layer only forwards it.
    pub bearer_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            // Only error if it's not "file not found" - that's acceptable
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            api: ApiConfig::from_env()?,
        })
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("API_BASE_URL")
            .map_err(|_| "API_BASE_URL must be set".to_string())?
            .trim_end_matches('/')
            .to_string();

        let bearer_token = env::var("API_BEARER_TOKEN").ok().filter(|t| !t.is_empty());

        Ok(ApiConfig {
            base_url,
            bearer_token,
        })
    }
}
