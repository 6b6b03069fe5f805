//! Post persistence.
//!
//! Handlers only see [`PostStore`]; which backend sits behind it is decided
//! once at startup from `DATABASE_URL`.
//!
//! | Backend | `DATABASE_URL` |
//! |---|---|
//! | [`SqlitePostStore`] | any `sqlite:` URL |
//! | [`MemoryPostStore`] | `memory` |
use std::sync::Arc;

pub mod error;
pub mod memory;
pub mod post_repo;
pub mod sqlite;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryPostStore;
pub use post_repo::{NewPost, PostChanges, PostRow, PostStore};
pub use sqlite::SqlitePostStore;

pub const MEMORY_DATABASE_URL: &str = "memory";

pub async fn connect(database_url: &str) -> StoreResult<Arc<dyn PostStore>> {
    if database_url.trim() == MEMORY_DATABASE_URL {
        return Ok(Arc::new(MemoryPostStore::new()));
    }

    Ok(Arc::new(SqlitePostStore::connect(database_url).await?))
}
