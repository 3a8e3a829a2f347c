//! SQLite store

use async_trait::async_trait;
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{clamp_page, NewReview, NewUser, Review, Store, User};
use crate::error::{Error, Result};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        hashed_password TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS reviews (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL,
        song_name TEXT NOT NULL,
        artist_name TEXT NOT NULL,
        review_text TEXT NOT NULL,
        date_time TEXT NOT NULL
    );
";

const REVIEW_COLUMNS: &str = "id, username, song_name, artist_name, review_text, date_time";

/// Store backed by a SQLite file, opened afresh for every operation
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn open(path: &Path) -> Result<Connection> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }

    /// Run `f` on the blocking pool with a connection that is closed when it returns
    async fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = Self::open(&path)?;
            f(&conn)
        })
        .await?
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        hashed_password: row.get(2)?,
    })
}

fn review_from_row(row: &Row<'_>) -> rusqlite::Result<Review> {
    Ok(Review {
        id: row.get(0)?,
        username: row.get(1)?,
        song_name: row.get(2)?,
        artist_name: row.get(3)?,
        review_text: row.get(4)?,
        date_time: row.get(5)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn select_review(conn: &Connection, id: i64) -> Result<Option<Review>> {
    let review = conn
        .query_row(
            &format!("SELECT {} FROM reviews WHERE id = ?1", REVIEW_COLUMNS),
            params![id],
            review_from_row,
        )
        .optional()?;
    Ok(review)
}

#[async_trait]
impl Store for SqliteStore {
    async fn init(&self) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        self.with_connection(move |conn| {
            let inserted = conn.execute(
                "INSERT INTO users (username, hashed_password) VALUES (?1, ?2)",
                params![user.username, user.hashed_password],
            );

            match inserted {
                Ok(_) => {
                    tracing::info!("Created user: {}", user.username);
                    Ok(User {
                        id: conn.last_insert_rowid(),
                        username: user.username,
                        hashed_password: user.hashed_password,
                    })
                }
                Err(e) if is_unique_violation(&e) => Err(Error::UsernameTaken(user.username)),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>> {
        let username = username.to_string();
        self.with_connection(move |conn| {
            let user = conn
                .query_row(
                    "SELECT id, username, hashed_password FROM users WHERE username = ?1",
                    params![username],
                    user_from_row,
                )
                .optional()?;
            Ok(user)
        })
        .await
    }

    async fn list_reviews(&self, skip: i64, limit: i64) -> Result<Vec<Review>> {
        let (skip, limit) = clamp_page(skip, limit);
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM reviews ORDER BY id LIMIT ?1 OFFSET ?2",
                REVIEW_COLUMNS
            ))?;
            let reviews = stmt
                .query_map(params![limit, skip], review_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(reviews)
        })
        .await
    }

    async fn get_review(&self, id: i64) -> Result<Option<Review>> {
        self.with_connection(move |conn| select_review(conn, id)).await
    }

    async fn create_review(&self, review: NewReview) -> Result<Review> {
        self.with_connection(move |conn| {
            let date_time = chrono::Utc::now();
            conn.execute(
                "INSERT INTO reviews (username, song_name, artist_name, review_text, date_time)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    review.username,
                    review.song_name,
                    review.artist_name,
                    review.review_text,
                    date_time,
                ],
            )?;

            Ok(Review {
                id: conn.last_insert_rowid(),
                username: review.username,
                song_name: review.song_name,
                artist_name: review.artist_name,
                review_text: review.review_text,
                date_time,
            })
        })
        .await
    }

    async fn update_review_text(&self, id: i64, review_text: &str) -> Result<Option<Review>> {
        let review_text = review_text.to_string();
        self.with_connection(move |conn| {
            let changed = conn.execute(
                "UPDATE reviews SET review_text = ?1 WHERE id = ?2",
                params![review_text, id],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            select_review(conn, id)
        })
        .await
    }

    async fn delete_review(&self, id: i64) -> Result<bool> {
        self.with_connection(move |conn| {
            let deleted = conn.execute("DELETE FROM reviews WHERE id = ?1", params![id])?;
            Ok(deleted > 0)
        })
        .await
    }
}
