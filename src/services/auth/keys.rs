/*
 * Responsibility
 * - the set of public keys access tokens may be signed with
 *   - one pinned PEM key, or the identity provider's JWKS
 * - pick the key for a token from its header (kid + alg) and refuse algorithm/key mismatches
 * - fetch the JWKS document over HTTP
 */
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::{
    Algorithm, DecodingKey,
    jwk::{AlgorithmParameters, EllipticCurve, Jwk, JwkSet, PublicKeyUse},
};
use url::Url;

use super::access_jwt::VerifyError;

const RSA_ALGORITHMS: &[Algorithm] = &[
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
];

const JWKS_TIMEOUT: Duration = Duration::from_secs(10);

pub struct SigningKey {
    kid: Option<String>,
    algorithms: Vec<Algorithm>,
    key: DecodingKey,
}

impl SigningKey {
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.key
    }
}

pub struct KeyRing {
    keys: Vec<SigningKey>,
}

impl std::fmt::Debug for KeyRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.keys.iter().map(|k| (&k.kid, &k.algorithms)))
            .finish()
    }
}

impl KeyRing {
    /// A single pinned key. It carries no `kid`, so it answers for any token header.
    pub fn from_pem(pem: &str, algorithm: Algorithm) -> Result<Self, VerifyError> {
        let bytes = pem.as_bytes();
        let key = match algorithm {
            Algorithm::EdDSA => DecodingKey::from_ed_pem(bytes),
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(bytes),
            alg if RSA_ALGORITHMS.contains(&alg) => DecodingKey::from_rsa_pem(bytes),
            other => return Err(VerifyError::UnsupportedAlgorithm(other)),
        }
        .map_err(VerifyError::InvalidKey)?;

        Ok(Self {
            keys: vec![SigningKey {
                kid: None,
                algorithms: vec![algorithm],
                key,
            }],
        })
    }

    /// Every signature key of a JWKS. Encryption and symmetric keys are skipped.
    pub fn from_jwks(set: &JwkSet) -> Result<Self, VerifyError> {
        let keys: Vec<SigningKey> = set
            .keys
            .iter()
            .filter_map(|jwk| {
                let key = signing_key(jwk);
                if key.is_none() {
                    tracing::debug!(kid = ?jwk.common.key_id, "skipping non-signature jwk");
                }
                key
            })
            .collect();

        if keys.is_empty() {
            return Err(VerifyError::NoUsableKeys);
        }
        Ok(Self { keys })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Key for a token header. A `kid` match wins; a lone key without `kid`
    /// (or a lone key with a token that names none) is used as is.
    pub fn select(&self, kid: Option<&str>, alg: Algorithm) -> Result<&SigningKey, VerifyError> {
        let by_id = kid.and_then(|kid| self.keys.iter().find(|k| k.kid.as_deref() == Some(kid)));

        let key = by_id
            .or_else(|| match self.keys.as_slice() {
                [only] if only.kid.is_none() || kid.is_none() => Some(only),
                _ => None,
            })
            .ok_or_else(|| VerifyError::UnknownKey(kid.map(str::to_string)))?;

        if !key.algorithms.contains(&alg) {
            return Err(VerifyError::UnsupportedAlgorithm(alg));
        }
        Ok(key)
    }
}

fn signing_key(jwk: &Jwk) -> Option<SigningKey> {
    if matches!(
        jwk.common.public_key_use,
        Some(PublicKeyUse::Encryption | PublicKeyUse::Other(_))
    ) {
        return None;
    }

    let family: Vec<Algorithm> = match &jwk.algorithm {
        AlgorithmParameters::RSA(_) => RSA_ALGORITHMS.to_vec(),
        AlgorithmParameters::EllipticCurve(params) => match params.curve {
            EllipticCurve::P256 => vec![Algorithm::ES256],
            EllipticCurve::P384 => vec![Algorithm::ES384],
            _ => return None,
        },
        AlgorithmParameters::OctetKeyPair(_) => vec![Algorithm::EdDSA],
        _ => return None,
    };

    // A declared `alg` pins the key to that one algorithm.
    let algorithms = match &jwk.common.key_algorithm {
        Some(declared) => {
            let alg = Algorithm::from_str(&declared.to_string()).ok()?;
            family.contains(&alg).then(|| vec![alg])?
        }
        None => family,
    };

    let key = DecodingKey::from_jwk(jwk)
        .inspect_err(|err| tracing::warn!(kid = ?jwk.common.key_id, error = %err, "unreadable jwk"))
        .ok()?;

    Some(SigningKey {
        kid: jwk.common.key_id.clone(),
        algorithms,
        key,
    })
}

pub async fn fetch_jwks(http: &reqwest::Client, url: &Url) -> Result<JwkSet, VerifyError> {
    let fail = |reason: String| VerifyError::KeyFetch {
        url: url.to_string(),
        reason,
    };

    http.get(url.clone())
        .timeout(JWKS_TIMEOUT)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| fail(e.to_string()))?
        .json::<JwkSet>()
        .await
        .map_err(|e| fail(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const JWKS: &str = include_str!("../../../tests/fixtures/jwks.json");
    const RSA_PUBLIC_PEM: &str = include_str!("../../../tests/fixtures/rsa_public.pem");

    fn ring() -> KeyRing {
        let set: JwkSet = serde_json::from_str(JWKS).unwrap();
        KeyRing::from_jwks(&set).unwrap()
    }

    #[test]
    fn jwks_keys_are_found_by_kid_and_pinned_to_their_alg() {
        let ring = ring();
        assert_eq!(ring.len(), 2);

        assert!(ring.select(Some("posts-rsa-1"), Algorithm::RS256).is_ok());
        assert!(ring.select(Some("posts-ed-1"), Algorithm::EdDSA).is_ok());

        // declared alg RS256 excludes the rest of the RSA family
        assert!(matches!(
            ring.select(Some("posts-rsa-1"), Algorithm::PS256),
            Err(VerifyError::UnsupportedAlgorithm(Algorithm::PS256))
        ));
        assert!(matches!(
            ring.select(Some("posts-ed-1"), Algorithm::RS256),
            Err(VerifyError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn unknown_or_missing_kid_is_rejected_when_several_keys_exist() {
        let ring = ring();
        assert!(matches!(
            ring.select(Some("rotated-away"), Algorithm::RS256),
            Err(VerifyError::UnknownKey(Some(_)))
        ));
        assert!(matches!(
            ring.select(None, Algorithm::RS256),
            Err(VerifyError::UnknownKey(None))
        ));
    }

    #[test]
    fn pinned_key_answers_any_kid() {
        let ring = KeyRing::from_pem(RSA_PUBLIC_PEM, Algorithm::RS256).unwrap();
        assert!(ring.select(Some("whatever"), Algorithm::RS256).is_ok());
        assert!(ring.select(None, Algorithm::RS256).is_ok());
        assert!(ring.select(None, Algorithm::EdDSA).is_err());
    }

    #[test]
    fn encryption_and_symmetric_keys_are_not_signing_keys() {
        let set: JwkSet = serde_json::from_value(serde_json::json!({
            "keys": [
                { "kty": "oct", "kid": "hmac", "k": "c2VjcmV0" },
                {
                    "kty": "RSA", "kid": "enc", "use": "enc", "alg": "RSA-OAEP",
                    "e": "AQAB", "n": "1TOPAujkVcJv3ZHfox90jJt3kjSrDqpWVNduhqsIaczBfWMD5n0P8o93AEpkziszx2Aj6iFiRPw1RUqjICCw5WgTDIu45EsJEK2cgzs56xTLR7Wf0L2EnEt0Mia24nf30LfLV2yPPedG1Yp0kBT661SLEngxvW0jTzWp_bHeSBj4Xvh5hwJcChVXhKs_1rQLQT64YARBtYLwpwWC4-u-b45U3roE_AGyy-_TX_f6IyWo2BEQbjfmx20LB-jqIjUQBSJ_h1kEFMjk2OvS77UDcLKnNMFBIB1IKteGtdSyg6X6I7sDCf_DLR6os789yGLG9YbH93VK7ZP26ogqcyrB6Q"
                }
            ]
        }))
        .unwrap();

        assert!(matches!(
            KeyRing::from_jwks(&set),
            Err(VerifyError::NoUsableKeys)
        ));
    }

    #[test]
    fn symmetric_pinned_algorithm_is_refused() {
        assert!(matches!(
            KeyRing::from_pem(RSA_PUBLIC_PEM, Algorithm::HS256),
            Err(VerifyError::UnsupportedAlgorithm(Algorithm::HS256))
        ));
    }
}
