//! Where the gateway gets its bearer credential.
//!
//! The gateway asks for a token on every call because tokens expire and rotate.
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("no access token available")]
    Missing,
    #[error("reading token file {path}: {source}")]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, TokenError>;
}

#[async_trait]
impl<T: TokenProvider + ?Sized> TokenProvider for Arc<T> {
    async fn access_token(&self) -> Result<String, TokenError> {
        (**self).access_token().await
    }
}

/// A token fixed at startup (flag or `POSTS_TOKEN`).
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(..)")
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String, TokenError> {
        let token = self.0.trim();
        if token.is_empty() {
            return Err(TokenError::Missing);
        }
        Ok(token.to_string())
    }
}

/// Re-reads a file on every call, so an external login helper can rotate it.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TokenProvider for TokenFile {
    async fn access_token(&self) -> Result<String, TokenError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| TokenError::File {
                path: self.path.clone(),
                source,
            })?;

        let token = raw.trim();
        if token.is_empty() {
            return Err(TokenError::Missing);
        }
        Ok(token.to_string())
    }
}
