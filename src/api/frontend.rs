//! Pre-built front-end bundle served for every path the route table does not claim.
//!
//! Only mounted in production. Client-side routes (`/posts`, `/posts/new`,
//! `/posts/{id}`) resolve to `index.html` so the single-page app can route them.
use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

pub const INDEX_FILE: &str = "index.html";

pub fn apply(router: Router, static_dir: &Path) -> Router {
    let index = static_dir.join(INDEX_FILE);
    tracing::info!(dir = %static_dir.display(), "serving front-end bundle as fallback");

    router.fallback_service(ServeDir::new(static_dir).fallback(ServeFile::new(index)))
}
