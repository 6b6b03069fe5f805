/*
 * Responsibility
 * - posts CRUD on SQLite through sqlx
 * - create the schema on connect (no migration tool for a single table)
 * - stamp updatedAt inside the same transaction that reads the previous stamp;
 *   that transaction takes the write lock up front (BEGIN IMMEDIATE), so
 *   concurrent updates queue on busy_timeout instead of failing a lock upgrade
 */
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use super::error::StoreResult;
use super::post_repo::{NewPost, PostChanges, PostRow, PostStore, next_update_stamp};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS posts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    body        TEXT NOT NULL DEFAULT '',
    "createdAt" TEXT NOT NULL,
    "updatedAt" TEXT
)
"#;

/// How long a writer waits for another writer's lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const COLUMNS: &str = r#"id, title, body, "createdAt", "updatedAt""#;

#[derive(Debug, Clone)]
pub struct SqlitePostStore {
    pool: SqlitePool,
}

impl SqlitePostStore {
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let in_memory = database_url.contains(":memory:");
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);

        // Every connection to `:memory:` opens its own database, so pin the
        // pool to a single connection that is never recycled.
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            // WAL: readers (list/get) never block the writer or each other.
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options.journal_mode(SqliteJournalMode::Wal))
                .await?
        };

        Self::with_pool(pool).await
    }

    pub async fn with_pool(pool: SqlitePool) -> StoreResult<Self> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl PostStore for SqlitePostStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn list(&self) -> StoreResult<Vec<PostRow>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!("SELECT {COLUMNS} FROM posts"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn create(&self, post: NewPost) -> StoreResult<PostRow> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            INSERT INTO posts (title, body, "createdAt")
            VALUES (?, ?, ?)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&post.title)
        .bind(&post.body)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get(&self, id: i64) -> StoreResult<Option<PostRow>> {
        let row = sqlx::query_as::<_, PostRow>(&format!("SELECT {COLUMNS} FROM posts WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn update(&self, id: i64, changes: PostChanges) -> StoreResult<Option<PostRow>> {
        // write lock before reading the previous stamp
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let current =
            sqlx::query_as::<_, PostRow>(&format!("SELECT {COLUMNS} FROM posts WHERE id = ?"))
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(current) = current else {
            return Ok(None);
        };

        let stamp = next_update_stamp(current.last_touched(), Utc::now());

        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE posts
            SET
                title = COALESCE(?, title),
                body = COALESCE(?, body),
                "updatedAt" = ?
            WHERE id = ?
            RETURNING {COLUMNS}
            "#
        ))
        .bind(changes.title)
        .bind(changes.body)
        .bind(stamp)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(row))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
