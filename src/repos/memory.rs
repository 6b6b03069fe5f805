//! In-process post store.
//!
//! Backs the router tests and `DATABASE_URL=memory`; nothing survives a restart.
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::error::StoreResult;
use super::post_repo::{NewPost, PostChanges, PostRow, PostStore, next_update_stamp};

#[derive(Debug, Default)]
pub struct MemoryPostStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    posts: BTreeMap<i64, PostRow>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> StoreResult<Vec<PostRow>> {
        Ok(self.inner.read().await.posts.values().cloned().collect())
    }

    async fn create(&self, post: NewPost) -> StoreResult<PostRow> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;

        let row = PostRow {
            id: inner.last_id,
            title: post.title,
            body: post.body,
            created_at: Utc::now(),
            updated_at: None,
        };
        inner.posts.insert(row.id, row.clone());

        Ok(row)
    }

    async fn get(&self, id: i64) -> StoreResult<Option<PostRow>> {
        Ok(self.inner.read().await.posts.get(&id).cloned())
    }

    async fn update(&self, id: i64, changes: PostChanges) -> StoreResult<Option<PostRow>> {
        let mut inner = self.inner.write().await;
        let Some(row) = inner.posts.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            row.title = title;
        }
        if let Some(body) = changes.body {
            row.body = body;
        }
        row.updated_at = Some(next_update_stamp(row.last_touched(), Utc::now()));

        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(self.inner.write().await.posts.remove(&id).is_some())
    }
}
