use crate::config::OAuthConfig;
use crate::error::{AppError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub const SDM_SCOPE: &str = "https://www.googleapis.com/auth/sdm.service";

/// Tokens this close to expiry are refreshed ahead of use.
const EXPIRY_DELTA_SECS: i64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

fn default_token_type() -> String {
    "Bearer".into()
}

impl Token {
    /// A token with no access token yet; the first use triggers a refresh.
    pub fn from_refresh_token(refresh_token: &str) -> Self {
        Self {
            access_token: String::new(),
            token_type: default_token_type(),
            refresh_token: Some(refresh_token.to_string()),
            expires_at: None,
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.access_token.is_empty() {
            return false;
        }
        match self.expires_at {
            Some(expiry) => expiry - Duration::seconds(EXPIRY_DELTA_SECS) > now,
            None => true,
        }
    }
}

/// Token response from the authorization server
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Hands out access tokens, refreshing them on demand.
pub struct TokenSource {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Token>,
}

impl TokenSource {
    pub fn new(http: reqwest::Client, oauth: &OAuthConfig) -> Self {
        let token = oauth
            .token
            .clone()
            .unwrap_or_else(|| Token::from_refresh_token(&oauth.refresh_token));

        Self {
            http,
            token_url: oauth.token_url.clone(),
            client_id: oauth.client_id.clone(),
            client_secret: oauth.client_secret.clone(),
            token: Mutex::new(token),
        }
    }

    /// Return a usable access token, refreshing first if the cached one is
    /// missing or about to expire. Concurrent callers wait on the same refresh.
    pub async fn access_token(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        if token.is_valid_at(Utc::now()) {
            return Ok(token.access_token.clone());
        }

        let refreshed = self.refresh(&token).await.map_err(|e| {
            warn!(token_url = %self.token_url, error = %e, "failed to refresh OAuth token");
            e
        })?;
        *token = refreshed;

        Ok(token.access_token.clone())
    }

    async fn refresh(&self, current: &Token) -> Result<Token> {
        let refresh_token = current
            .refresh_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::Auth("token expired and no refresh token is available".to_string())
            })?;

        debug!(token_url = %self.token_url, "refreshing OAuth access token");

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", SDM_SCOPE),
            ])
            .send()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Auth(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        let data: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("invalid token response: {}", e)))?;

        Ok(Token {
            access_token: data.access_token,
            token_type: data.token_type.unwrap_or_else(default_token_type),
            // The server only sends a refresh token when it rotates it
            refresh_token: data
                .refresh_token
                .or_else(|| Some(refresh_token.to_string())),
            expires_at: data
                .expires_in
                .map(|secs| Utc::now() + Duration::seconds(secs)),
        })
    }
}
