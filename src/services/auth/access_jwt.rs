use std::sync::{Arc, PoisonError, RwLock};

use jsonwebtoken::{Algorithm, Validation};
use serde::Deserialize;
use thiserror::Error;

use super::keys::KeyRing;
use crate::config::AuthConfig;

// Errors returned by access-token verification + strict claim validation.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("invalid public key: {0}")]
    InvalidKey(jsonwebtoken::errors::Error),
    #[error("algorithm {0:?} is not accepted for this key")]
    UnsupportedAlgorithm(Algorithm),
    #[error("no signing key matches kid {0:?}")]
    UnknownKey(Option<String>),
    #[error("key set holds no usable signature keys")]
    NoUsableKeys,
    #[error("fetching key set from {url} failed: {reason}")]
    KeyFetch { url: String, reason: String },
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
    #[error("token was issued to a different client")]
    ClientMismatch,
}

/// Access token (JWT) claims, as issued by the identity provider.
///
/// NOTE:
/// - Okta puts the OAuth client id in `cid` and granted scopes in `scp`;
///   other providers use a space-separated `scope`. Both are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    pub iss: String,
    pub sub: String,
    pub exp: u64,

    #[serde(default)]
    pub cid: Option<String>,
    #[serde(default)]
    pub scp: Option<Vec<String>>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// The identity a verified bearer token speaks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub subject: String,
    pub client_id: Option<String>,
    pub scopes: Vec<String>,
}

/// Accept/reject decision for a bearer credential.
///
/// Implementations must not touch the post store; a rejection has to be
/// decided on the token alone.
pub trait TokenVerifier: Send + Sync + 'static {
    fn verify(&self, token: &str) -> Result<Caller, VerifyError>;
}

/// Access-token verifier over a [`KeyRing`].
///
/// - The token header picks the key (`kid`) and the algorithm; the algorithm
///   must be one the key is registered for, so `alg` cannot be swapped.
/// - Keys can be replaced while requests are in flight (JWKS rotation).
/// - Key material is intentionally not printable via Debug.
pub struct JwtVerifier {
    keys: RwLock<Arc<KeyRing>>,
    validation: Validation,
    client_id: Option<String>,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("validation", &self.validation)
            .field("client_id", &self.client_id)
            .field("keys", &self.current_keys())
            .finish()
    }
}

impl JwtVerifier {
    pub fn new(config: &AuthConfig, keys: KeyRing) -> Self {
        // `algorithms` is overwritten per token with the header's (checked) alg.
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = config.leeway_seconds;

        match &config.audience {
            Some(audience) => validation.set_audience(&[audience.as_str()]),
            // Without a configured audience any `aud` the provider adds is accepted.
            None => validation.validate_aud = false,
        }

        Self {
            keys: RwLock::new(Arc::new(keys)),
            validation,
            client_id: config.client_id.clone(),
        }
    }

    pub fn replace_keys(&self, keys: KeyRing) {
        let mut current = self.keys.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(keys);
    }

    fn current_keys(&self) -> Arc<KeyRing> {
        Arc::clone(&self.keys.read().unwrap_or_else(PoisonError::into_inner))
    }

    // Signature, `exp`, `iss` (and `aud` when configured) are checked by jsonwebtoken.
    pub fn decode(&self, token: &str) -> Result<AccessTokenClaims, VerifyError> {
        let header = jsonwebtoken::decode_header(token)?;
        let keys = self.current_keys();
        let key = keys.select(header.kid.as_deref(), header.alg)?;

        let mut validation = self.validation.clone();
        validation.algorithms = vec![header.alg];

        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, key.decoding_key(), &validation)?;

        Ok(data.claims)
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<Caller, VerifyError> {
        let claims = self.decode(token)?;

        if claims.sub.trim().is_empty() {
            return Err(VerifyError::EmptyClaim("sub"));
        }

        if let Some(expected) = &self.client_id
            && claims.cid.as_deref() != Some(expected.as_str())
        {
            return Err(VerifyError::ClientMismatch);
        }

        let scopes = match (claims.scp, claims.scope) {
            (Some(scp), _) => scp,
            (None, Some(scope)) => scope.split_whitespace().map(str::to_string).collect(),
            (None, None) => Vec::new(),
        };

        Ok(Caller {
            subject: claims.sub,
            client_id: claims.cid,
            scopes,
        })
    }
}
