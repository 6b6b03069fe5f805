pub mod access_jwt;
pub mod factory;
pub mod keys;

pub use access_jwt::{Caller, JwtVerifier, TokenVerifier, VerifyError};
pub use factory::build_token_verifier;
pub use keys::{KeyRing, fetch_jwks};
