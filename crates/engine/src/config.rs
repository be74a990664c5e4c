use crate::generate::{AccessTokenCodeGenerate, JwtAccessTokenGenerate, RandomCodeGenerate};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use time::Duration;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessTokenFormat {
    #[default]
    Random,
    Jwt,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OAuthConfig {
    /// Authorization code lifetime in seconds
    #[serde(default = "default_authorize_code_expire_secs")]
    pub authorize_code_expire_secs: i64,
    /// Access token lifetime in seconds
    #[serde(default = "default_access_token_expire_secs")]
    pub access_token_expire_secs: i64,
    #[serde(default)]
    pub access_token_format: AccessTokenFormat,
    /// HMAC secret for JWT access tokens. Required when `access_token_format` is `jwt`.
    #[serde(default)]
    pub jwt_secret: Option<String>,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            authorize_code_expire_secs: default_authorize_code_expire_secs(),
            access_token_expire_secs: default_access_token_expire_secs(),
            access_token_format: AccessTokenFormat::default(),
            jwt_secret: None,
        }
    }
}

/// Upper bound for either lifetime: ten years.
pub const MAX_LIFETIME_SECS: i64 = 10 * 365 * 24 * 60 * 60;

fn default_authorize_code_expire_secs() -> i64 {
    600 // 10 minutes
}

fn default_access_token_expire_secs() -> i64 {
    86400 // 24 hours
}

impl OAuthConfig {
    pub fn authorize_code_expire(&self) -> Duration {
        Duration::seconds(self.authorize_code_expire_secs)
    }

    pub fn access_token_expire(&self) -> Duration {
        Duration::seconds(self.access_token_expire_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.authorize_code_expire_secs <= 0 {
            return Err(ConfigError::Validation(
                "oauth.authorize_code_expire_secs must be > 0".into(),
            ));
        }
        if self.access_token_expire_secs <= 0 {
            return Err(ConfigError::Validation(
                "oauth.access_token_expire_secs must be > 0".into(),
            ));
        }
        if self.authorize_code_expire_secs > MAX_LIFETIME_SECS
            || self.access_token_expire_secs > MAX_LIFETIME_SECS
        {
            return Err(ConfigError::Validation(format!(
                "oauth lifetimes must not exceed {MAX_LIFETIME_SECS} seconds"
            )));
        }
        if self.authorize_code_expire_secs > self.access_token_expire_secs {
            return Err(ConfigError::Validation(
                "oauth.authorize_code_expire_secs must not exceed oauth.access_token_expire_secs"
                    .into(),
            ));
        }
        if self.access_token_format == AccessTokenFormat::Jwt {
            match &self.jwt_secret {
                Some(secret) if secret.len() >= 32 => {}
                _ => {
                    return Err(ConfigError::Validation(
                        "oauth.jwt_secret must be at least 32 characters for jwt access tokens"
                            .into(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Build the access-token generator selected by `access_token_format`.
    pub fn access_token_generator(&self) -> Result<Arc<dyn AccessTokenCodeGenerate>, ConfigError> {
        match self.access_token_format {
            AccessTokenFormat::Random => Ok(Arc::new(RandomCodeGenerate)),
            AccessTokenFormat::Jwt => {
                let secret = self.jwt_secret.as_deref().ok_or_else(|| {
                    ConfigError::Validation("oauth.jwt_secret is required for jwt".into())
                })?;
                Ok(Arc::new(JwtAccessTokenGenerate::new(secret.as_bytes())))
            }
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    #[serde(default)]
    pub oauth: OAuthConfig,
}

/// Load application configuration from `config.yaml` + environment overrides.
///
/// A `.env` file is read first if present. Any variable matching the key path
/// separated by double underscores (e.g. `OAUTH__ACCESS_TOKEN_EXPIRE_SECS`)
/// overrides the file value.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from("config.yaml")
}

pub fn load_config_from(path: &str) -> Result<AppConfig, ConfigError> {
    use config::{Config, Environment, File};

    let _ = dotenvy::dotenv();
    let cfg = Config::builder()
        .add_source(File::with_name(path))
        .add_source(Environment::default().separator("__"))
        .build()?;

    let app: AppConfig = cfg.try_deserialize()?;

    if app.database_url.is_empty() {
        return Err(ConfigError::Validation("database_url must be set".into()));
    }
    app.oauth.validate()?;

    Ok(app)
}
