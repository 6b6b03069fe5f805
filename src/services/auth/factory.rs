/// Factory: build the token verifier from application `Config`.
use std::sync::{Arc, Weak};
use std::time::Duration;

use url::Url;

use crate::config::{Config, KeySource};
use crate::services::auth::keys::{KeyRing, fetch_jwks};
use crate::services::auth::{JwtVerifier, TokenVerifier, VerifyError};

pub async fn build_token_verifier(config: &Config) -> Result<Arc<dyn TokenVerifier>, VerifyError> {
    let verifier = match &config.auth.keys {
        KeySource::Pem { pem, algorithm } => {
            let keys = KeyRing::from_pem(pem, *algorithm).inspect_err(|err| {
                tracing::error!(error = %err, "failed to read the access token public key");
            })?;
            Arc::new(JwtVerifier::new(&config.auth, keys))
        }
        KeySource::Jwks { url, refresh } => {
            let http = reqwest::Client::new();
            let keys = load_jwks(&http, url).await.inspect_err(|err| {
                tracing::error!(error = %err, "failed to load the issuer key set");
            })?;
            let verifier = Arc::new(JwtVerifier::new(&config.auth, keys));
            spawn_jwks_refresh(Arc::downgrade(&verifier), http, url.clone(), *refresh);
            verifier
        }
    };

    tracing::info!(
        issuer = %config.auth.issuer,
        client_id = ?config.auth.client_id,
        verifier = ?verifier,
        "access token verifier ready"
    );

    Ok(verifier)
}

async fn load_jwks(http: &reqwest::Client, url: &Url) -> Result<KeyRing, VerifyError> {
    let set = fetch_jwks(http, url).await?;
    KeyRing::from_jwks(&set)
}

// Ends once the verifier is dropped. A failed refresh keeps the previous keys.
fn spawn_jwks_refresh(verifier: Weak<JwtVerifier>, http: reqwest::Client, url: Url, every: Duration) {
    tokio::spawn(async move {
        let mut ticks = tokio::time::interval(every);
        ticks.tick().await;

        loop {
            ticks.tick().await;
            let Some(verifier) = verifier.upgrade() else {
                break;
            };

            match load_jwks(&http, &url).await {
                Ok(keys) => {
                    tracing::debug!(url = %url, keys = keys.len(), "issuer key set refreshed");
                    verifier.replace_keys(keys);
                }
                Err(err) => tracing::warn!(error = %err, "issuer key set refresh failed"),
            }
        }
    });
}
