use std::str::FromStr;

use chrono::{DateTime, Utc};
use dew_api::v1::{ParseStatusError, Todo};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    FromRow,
};

/// Columns returned by every statement that yields todos, in [`TodoRow`] order.
pub const TODO_COLUMNS: &str = "id, title, description, status, created_at, updated_at";

/// Handle to the todo database.
///
/// Opened with [`Db::connect`] (or [`Db::memory`] in tests), which also applies
/// pending migrations, and closed with [`Db::close`].
#[derive(Clone, Debug)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Self::migrate(pool).await
    }

    /// A private in-memory database. Every connection to `sqlite::memory:`
    /// opens a distinct database, so the pool is pinned to one connection
    /// that is never recycled.
    #[cfg(test)]
    pub async fn memory() -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Microseconds since the unix epoch, the unit timestamps are stored in.
pub fn now_micros() -> i64 {
    Utc::now().timestamp_micros()
}

#[derive(Debug, FromRow)]
pub struct TodoRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TodoRow {
    pub fn into_todo(self) -> Result<Todo, sqlx::Error> {
        Ok(Todo {
            id: self.id,
            title: self.title,
            description: self.description,
            status: self
                .status
                .parse()
                .map_err(|err: ParseStatusError| sqlx::Error::Decode(Box::new(err)))?,
            created_at: timestamp(self.created_at)?,
            updated_at: timestamp(self.updated_at)?,
        })
    }
}

fn timestamp(micros: i64) -> Result<DateTime<Utc>, sqlx::Error> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| sqlx::Error::Decode(format!("timestamp out of range: {micros}").into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_database_is_migrated() {
        let db = Db::memory().await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);

        db.close().await;
    }

    #[tokio::test]
    async fn table_rejects_unknown_status() {
        let db = Db::memory().await.unwrap();

        let result = sqlx::query(
            "INSERT INTO todos (title, status, created_at, updated_at) VALUES ('a', 'done', 0, 0)",
        )
        .execute(db.pool())
        .await;
        assert!(result.is_err());
    }

    #[test]
    fn row_converts_to_todo() {
        let row = TodoRow {
            id: 1,
            title: String::from("a"),
            description: None,
            status: String::from("completed"),
            created_at: 1_700_000_000_000_000,
            updated_at: 1_700_000_000_000_001,
        };

        let todo = row.into_todo().unwrap();
        assert_eq!(todo.status, dew_api::v1::TodoStatus::Completed);
        assert_eq!(todo.created_at.timestamp_micros(), 1_700_000_000_000_000);
        assert!(todo.updated_at > todo.created_at);
    }

    #[test]
    fn row_with_bad_status_fails_to_decode() {
        let row = TodoRow {
            id: 1,
            title: String::from("a"),
            description: None,
            status: String::from("archived"),
            created_at: 0,
            updated_at: 0,
        };

        assert!(matches!(row.into_todo(), Err(sqlx::Error::Decode(_))));
    }
}
