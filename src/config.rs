use crate::auth::Token;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub nest: NestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_server_host() -> String {
    "0.0.0.0".into()
}

fn default_server_port() -> u16 {
    9264
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

/// Everything needed to reach the Smart Device Management API for one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub project_id: String,
    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    pub oauth: OAuthConfig,
}

fn default_api_url() -> String {
    "https://smartdevicemanagement.googleapis.com/v1".into()
}

fn default_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    /// Pre-supplied token; when absent one is built from `refresh_token`
    #[serde(default)]
    pub token: Option<Token>,
}

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".into()
}

impl Config {
    /// Load YAML from disk, substitute $(VAR)/${VAR} with env vars, then parse.
    /// Afterwards the NEST_* environment variables override whatever YAML had.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let expanded = expand_env_placeholders(&raw)?;
        let mut cfg: Self = serde_yaml::from_str(&expanded)?;

        cfg.apply_env_overrides();
        cfg.validate()?;

        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        let overrides: [(&str, &mut String); 5] = [
            ("NEST_API_URL", &mut self.nest.api_url),
            ("NEST_PROJECT_ID", &mut self.nest.project_id),
            ("NEST_CLIENT_ID", &mut self.nest.oauth.client_id),
            ("NEST_CLIENT_SECRET", &mut self.nest.oauth.client_secret),
            ("NEST_REFRESH_TOKEN", &mut self.nest.oauth.refresh_token),
        ];
        for (var, field) in overrides {
            if let Ok(value) = std::env::var(var) {
                *field = value;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Config("Server port cannot be 0".to_string()));
        }

        if self.nest.project_id.is_empty() {
            return Err(AppError::Config(
                "nest.project_id cannot be empty".to_string(),
            ));
        }

        if self.nest.timeout_ms == 0 {
            return Err(AppError::Config(
                "nest.timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.nest.oauth.client_id.is_empty() {
            return Err(AppError::Config(
                "nest.oauth.client_id cannot be empty".to_string(),
            ));
        }

        let has_token = self
            .nest
            .oauth
            .token
            .as_ref()
            .map(|t| {
                !t.access_token.is_empty()
                    || t.refresh_token.as_deref().is_some_and(|r| !r.is_empty())
            })
            .unwrap_or(false);
        if !has_token && self.nest.oauth.refresh_token.is_empty() {
            return Err(AppError::Config(
                "Either nest.oauth.refresh_token or nest.oauth.token must be provided".to_string(),
            ));
        }

        Ok(())
    }
}

/// Expand $(VAR) and ${VAR} placeholders using environment variables.
/// "$$" becomes a literal "$".
fn expand_env_placeholders(input: &str) -> Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut it = input.chars().peekable();

    while let Some(c) = it.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let close = match it.peek().copied() {
            Some('$') => {
                it.next();
                out.push('$');
                continue;
            }
            Some('(') => ')',
            Some('{') => '}',
            _ => {
                out.push('$');
                continue;
            }
        };
        it.next(); // consume the opening delimiter
        let var = read_until(&mut it, close).ok_or_else(|| {
            AppError::Config(format!("unterminated env placeholder: missing '{}'", close))
        })?;
        let val = std::env::var(&var)
            .map_err(|_| AppError::Config(format!("missing environment variable: {}", var)))?;
        out.push_str(&val);
    }

    Ok(out)
}

/// Read characters until we hit `end`, consuming the closing delimiter.
fn read_until<I>(it: &mut std::iter::Peekable<I>, end: char) -> Option<String>
where
    I: Iterator<Item = char>,
{
    let mut buf = String::new();
    for ch in it.by_ref() {
        if ch == end {
            return Some(buf);
        }
        buf.push(ch);
    }
    None
}
