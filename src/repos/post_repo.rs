/*
 * Responsibility
 * - the post store contract (list / create / get / update / delete)
 * - the row shape every backend returns
 * - the updatedAt stamping rule shared by all backends
 */
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::error::StoreResult;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,

    pub title: String,
    pub body: String,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    /// `None` until the first successful update.
    #[sqlx(rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PostRow {
    /// Latest timestamp the store has written for this row.
    pub fn last_touched(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub body: String,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Persistence contract for posts.
///
/// Ids are assigned by the store on `create` and never change or get reused.
/// `get`/`update` return `None` and `delete` returns `false` for an unknown id.
#[async_trait]
pub trait PostStore: Send + Sync + 'static {
    fn backend_name(&self) -> &'static str;

    /// All posts, in no particular order.
    async fn list(&self) -> StoreResult<Vec<PostRow>>;

    async fn create(&self, post: NewPost) -> StoreResult<PostRow>;

    async fn get(&self, id: i64) -> StoreResult<Option<PostRow>>;

    async fn update(&self, id: i64, changes: PostChanges) -> StoreResult<Option<PostRow>>;

    async fn delete(&self, id: i64) -> StoreResult<bool>;
}

/// Next `updatedAt` for a row last written at `previous`.
///
/// Strictly greater than `previous` even when the clock has not moved
/// (or moved backwards) since.
pub fn next_update_stamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_follows_the_clock_when_it_moves_forward() {
        let previous = Utc::now();
        let now = previous + Duration::seconds(5);
        assert_eq!(next_update_stamp(previous, now), now);
    }

    #[test]
    fn stamp_still_advances_on_a_stalled_or_skewed_clock() {
        let previous = Utc::now();
        assert!(next_update_stamp(previous, previous) > previous);
        assert!(next_update_stamp(previous, previous - Duration::seconds(30)) > previous);
    }
}
