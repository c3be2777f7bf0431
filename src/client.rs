use crate::auth::TokenSource;
use crate::config::NestConfig;
use crate::error::{AppError, Result};
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tracing::debug;

/// Authenticated client for the SDM device-listing endpoint.
pub struct NestClient {
    http: reqwest::Client,
    url: String,
    tokens: TokenSource,
}

impl NestClient {
    pub fn new(cfg: &NestConfig) -> Result<Self> {
        let parsed = Url::parse(&cfg.api_url).map_err(|e| {
            AppError::Config(format!(
                "failed parsing Nest API URL {:?}: {}",
                cfg.api_url, e
            ))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "Nest API URL must be http(s), got {:?}",
                cfg.api_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| AppError::Config(format!("failed building HTTP client: {}", e)))?;

        Ok(Self {
            tokens: TokenSource::new(http.clone(), &cfg.oauth),
            url: devices_url(&cfg.api_url, &cfg.project_id),
            http,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one GET against the device listing and return the raw body.
    pub async fn fetch(&self) -> Result<Vec<u8>> {
        let access_token = self.tokens.access_token().await?;

        let response = self
            .http
            .get(&self.url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(AppError::Request)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AppError::Non200Response {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(AppError::ReadBody)?;
        debug!(url = %self.url, bytes = body.len(), "fetched Nest device list");

        Ok(body.to_vec())
    }
}

pub fn devices_url(api_url: &str, project_id: &str) -> String {
    format!(
        "{}/enterprises/{}/devices/",
        api_url.trim_end_matches('/'),
        project_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OAuthConfig;

    fn nest_config(api_url: &str) -> NestConfig {
        NestConfig {
            api_url: api_url.to_string(),
            project_id: "project-1".into(),
            timeout_ms: 1000,
            oauth: OAuthConfig {
                client_id: "client".into(),
                client_secret: "secret".into(),
                refresh_token: "refresh".into(),
                token_url: "http://127.0.0.1:9/token".into(),
                token: None,
            },
        }
    }

    #[test]
    fn test_devices_url_strips_trailing_slashes() {
        assert_eq!(
            devices_url("https://sdm.example.com/v1", "p"),
            "https://sdm.example.com/v1/enterprises/p/devices/"
        );
        assert_eq!(
            devices_url("https://sdm.example.com/v1///", "p"),
            "https://sdm.example.com/v1/enterprises/p/devices/"
        );
    }

    #[test]
    fn test_new_builds_request_url() {
        let client = NestClient::new(&nest_config("https://sdm.example.com/v1/")).unwrap();
        assert_eq!(
            client.url(),
            "https://sdm.example.com/v1/enterprises/project-1/devices/"
        );
    }

    #[test]
    fn test_new_rejects_malformed_url() {
        for bad in ["", "not a url", "/relative/path", "ftp://sdm.example.com"] {
            assert!(
                matches!(NestClient::new(&nest_config(bad)), Err(AppError::Config(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }
}
