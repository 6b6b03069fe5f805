/*
 * Responsibility
 * - read settings from the environment (.env is honoured via dotenvy)
 * - validate them up front so a bad deployment fails at startup, not on the first request
 */
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use thiserror::Error;
use url::Url;

pub const DEFAULT_PORT: u16 = 3007;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://posts.sqlite?mode=rwc";
pub const DEFAULT_STATIC_DIR: &str = "client/build";
/// Okta custom authorization servers publish their signing keys here, relative to the issuer.
pub const DEFAULT_JWKS_PATH: &str = "/v1/keys";
pub const DEFAULT_JWKS_REFRESH: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Where token signing keys come from.
#[derive(Debug, Clone)]
pub enum KeySource {
    /// One public key pinned in configuration (`AUTH_PUBLIC_KEY_PEM`).
    Pem { pem: String, algorithm: Algorithm },
    /// The identity provider's JWKS, fetched at startup and refreshed periodically.
    Jwks { url: Url, refresh: Duration },
}

/// Bearer-token verification settings (the identity provider's issuer and client).
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub issuer: String,
    pub client_id: Option<String>,
    pub audience: Option<String>,
    pub keys: KeySource,
    pub leeway_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,

    pub app_env: AppEnv,
    pub static_dir: PathBuf,
    pub cors_allowed_origins: Vec<String>,

    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
            Err(_) => DEFAULT_PORT,
        };
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let app_env = AppEnv::from_env();

        let static_dir = std::env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR));

        let cors_allowed_origins = split_list(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let issuer = non_empty_var("AUTH_ISSUER").ok_or(ConfigError::Missing("AUTH_ISSUER"))?;
        Url::parse(&issuer).map_err(|_| ConfigError::Invalid("AUTH_ISSUER"))?;

        let keys = key_source(&issuer)?;

        let leeway_seconds = match std::env::var("ACCESS_TOKEN_LEEWAY_SECONDS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_LEEWAY_SECONDS"))?,
            Err(_) => 60,
        };

        Ok(Self {
            addr,
            database_url,
            app_env,
            static_dir,
            cors_allowed_origins,
            auth: AuthConfig {
                issuer,
                client_id: non_empty_var("AUTH_CLIENT_ID"),
                audience: non_empty_var("AUTH_AUDIENCE"),
                keys,
                leeway_seconds,
            },
        })
    }
}

/// A pinned PEM wins; otherwise keys come from the issuer's JWKS.
fn key_source(issuer: &str) -> Result<KeySource, ConfigError> {
    if let Some(pem) = non_empty_var("AUTH_PUBLIC_KEY_PEM") {
        let algorithm = match non_empty_var("AUTH_ALGORITHM") {
            Some(raw) => parse_algorithm(&raw)?,
            None => Algorithm::EdDSA,
        };
        return Ok(KeySource::Pem {
            pem: pem.replace("\\n", "\n"),
            algorithm,
        });
    }

    let url = match non_empty_var("AUTH_JWKS_URL") {
        Some(raw) => Url::parse(&raw).map_err(|_| ConfigError::Invalid("AUTH_JWKS_URL"))?,
        None => default_jwks_url(issuer)?,
    };

    let refresh = match std::env::var("AUTH_JWKS_REFRESH_SECONDS") {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .ok_or(ConfigError::Invalid("AUTH_JWKS_REFRESH_SECONDS"))?,
        Err(_) => DEFAULT_JWKS_REFRESH,
    };

    Ok(KeySource::Jwks { url, refresh })
}

pub fn default_jwks_url(issuer: &str) -> Result<Url, ConfigError> {
    Url::parse(&format!("{}{DEFAULT_JWKS_PATH}", issuer.trim_end_matches('/')))
        .map_err(|_| ConfigError::Invalid("AUTH_ISSUER"))
}

/// Asymmetric JWS algorithms only; a shared HMAC secret has no place in a public config.
pub fn parse_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    let algorithm =
        Algorithm::from_str(raw.trim()).map_err(|_| ConfigError::Invalid("AUTH_ALGORITHM"))?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            Err(ConfigError::Invalid("AUTH_ALGORITHM"))
        }
        other => Ok(other),
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
