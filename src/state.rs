/*
 * Responsibility
 * - the shared context attached to the Router (AppState)
 *   - store: where posts live, verifier: who may touch them
 * - cheap to Clone (everything behind Arc)
 */
use std::sync::Arc;

use crate::repos::PostStore;
use crate::services::auth::TokenVerifier;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PostStore>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn PostStore>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { store, verifier }
    }
}
