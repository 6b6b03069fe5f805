/*
 * Responsibility
 * - the uniform envelope around every call to the resource server:
 *   content-type / accept / fresh bearer token, JSON body out, JSON body in
 * - never raise: every failure (token, transport, undecodable body) is logged
 *   and handed back as Fetch::Failure for the caller to degrade
 * - the HTTP status is not inspected; an error envelope simply fails to decode
 *   as the expected type
 */
use async_trait::async_trait;
use reqwest::{
    Method,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use url::Url;

use crate::{auth::TokenProvider, model::Post};

pub const DEFAULT_API: &str = "http://localhost:3007";
pub const COLLECTION_PATH: &str = "/post";

const JSON: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("access token unavailable: {0}")]
    Token(String),
    #[error("request body could not be encoded: {0}")]
    Encode(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("status {status} response is not the expected JSON: {reason}")]
    Decode { status: u16, reason: String },
}

/// Outcome of one gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch<T> {
    Success(T),
    Failure(FetchFailure),
}

impl<T> Fetch<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            Fetch::Success(value) => Some(value),
            Fetch::Failure(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetch<U> {
        match self {
            Fetch::Success(value) => Fetch::Success(f(value)),
            Fetch::Failure(failure) => Fetch::Failure(failure),
        }
    }
}

impl<T> From<Result<T, FetchFailure>> for Fetch<T> {
    fn from(result: Result<T, FetchFailure>) -> Self {
        match result {
            Ok(value) => Fetch::Success(value),
            Err(failure) => Fetch::Failure(failure),
        }
    }
}

/// The REST calls the controller depends on.
#[async_trait]
pub trait PostsApi: Send + Sync {
    async fn list_posts(&self) -> Fetch<Vec<Post>>;

    async fn create_post(&self, post: &Post) -> Fetch<Post>;

    async fn update_post(&self, id: i64, post: &Post) -> Fetch<Post>;

    async fn delete_post(&self, id: i64) -> Fetch<()>;
}

pub struct Gateway<P> {
    http: reqwest::Client,
    base: Url,
    tokens: P,
}

impl<P: TokenProvider> Gateway<P> {
    pub fn new(base: Url, tokens: P) -> Self {
        Self::with_client(reqwest::Client::new(), base, tokens)
    }

    pub fn with_client(http: reqwest::Client, base: Url, tokens: P) -> Self {
        Self { http, base, tokens }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base.as_str().trim_end_matches('/'), path)
    }

    /// Issue `method endpoint` with an optional JSON body and decode the reply as `T`.
    pub async fn fetch<T, B>(&self, method: Method, endpoint: &str, body: Option<&B>) -> Fetch<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let outcome = self.round_trip(method.clone(), endpoint, body).await;

        if let Err(failure) = &outcome {
            tracing::warn!(%method, endpoint, error = %failure, "posts api call failed");
        }

        outcome.into()
    }

    async fn round_trip<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, FetchFailure>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let token = self
            .tokens
            .access_token()
            .await
            .map_err(|e| FetchFailure::Token(e.to_string()))?;

        let mut request = self
            .http
            .request(method, self.endpoint(endpoint))
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON)
            .header(AUTHORIZATION, format!("Bearer {token}"));

        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(|e| FetchFailure::Encode(e.to_string()))?;
            request = request.body(bytes);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        // 204 and friends carry no body; read that as JSON null.
        let raw: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };

        serde_json::from_slice(raw).map_err(|e| FetchFailure::Decode {
            status,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl<P: TokenProvider> PostsApi for Gateway<P> {
    async fn list_posts(&self) -> Fetch<Vec<Post>> {
        self.fetch::<_, ()>(Method::GET, COLLECTION_PATH, None).await
    }

    async fn create_post(&self, post: &Post) -> Fetch<Post> {
        self.fetch(Method::POST, COLLECTION_PATH, Some(post)).await
    }

    async fn update_post(&self, id: i64, post: &Post) -> Fetch<Post> {
        self.fetch(Method::PUT, &format!("{COLLECTION_PATH}/{id}"), Some(post))
            .await
    }

    async fn delete_post(&self, id: i64) -> Fetch<()> {
        // Expect an empty (or post-shaped) reply so an error envelope is a Failure.
        self.fetch::<Option<Post>, ()>(Method::DELETE, &format!("{COLLECTION_PATH}/{id}"), None)
            .await
            .map(|_| ())
    }
}
