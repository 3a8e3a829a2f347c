//! PostgreSQL store

use async_trait::async_trait;
use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, NoTls, Row};

use super::{clamp_page, NewReview, NewUser, Review, Store, User};
use crate::error::{Error, Result};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        hashed_password TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS reviews (
        id BIGSERIAL PRIMARY KEY,
        username TEXT NOT NULL,
        song_name TEXT NOT NULL,
        artist_name TEXT NOT NULL,
        review_text TEXT NOT NULL,
        date_time TIMESTAMPTZ NOT NULL DEFAULT now()
    );
";

const REVIEW_COLUMNS: &str = "id, username, song_name, artist_name, review_text, date_time";

/// Store backed by PostgreSQL. Each operation opens its own connection.
pub struct PostgresStore {
    url: String,
}

impl PostgresStore {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    async fn connect(&self) -> Result<Client> {
        let (client, connection) = tokio_postgres::connect(&self.url, NoTls).await?;

        // Finishes once the client is dropped
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        Ok(client)
    }
}

fn user_from_row(row: &Row) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        hashed_password: row.get("hashed_password"),
    }
}

fn review_from_row(row: &Row) -> Review {
    Review {
        id: row.get("id"),
        username: row.get("username"),
        song_name: row.get("song_name"),
        artist_name: row.get("artist_name"),
        review_text: row.get("review_text"),
        date_time: row.get("date_time"),
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn init(&self) -> Result<()> {
        let client = self.connect().await?;
        client.batch_execute(SCHEMA).await?;
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let client = self.connect().await?;
        let inserted = client
            .query_one(
                "INSERT INTO users (username, hashed_password) VALUES ($1, $2)
                 RETURNING id, username, hashed_password",
                &[&user.username, &user.hashed_password],
            )
            .await;

        match inserted {
            Ok(row) => {
                tracing::info!("Created user: {}", user.username);
                Ok(user_from_row(&row))
            }
            Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => {
                Err(Error::UsernameTaken(user.username))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>> {
        let client = self.connect().await?;
        let row = client
            .query_opt(
                "SELECT id, username, hashed_password FROM users WHERE username = $1",
                &[&username],
            )
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn list_reviews(&self, skip: i64, limit: i64) -> Result<Vec<Review>> {
        let (skip, limit) = clamp_page(skip, limit);
        let client = self.connect().await?;
        let rows = client
            .query(
                &format!(
                    "SELECT {} FROM reviews ORDER BY id LIMIT $1 OFFSET $2",
                    REVIEW_COLUMNS
                ),
                &[&limit, &skip],
            )
            .await?;
        Ok(rows.iter().map(review_from_row).collect())
    }

    async fn get_review(&self, id: i64) -> Result<Option<Review>> {
        let client = self.connect().await?;
        let row = client
            .query_opt(
                &format!("SELECT {} FROM reviews WHERE id = $1", REVIEW_COLUMNS),
                &[&id],
            )
            .await?;
        Ok(row.as_ref().map(review_from_row))
    }

    async fn create_review(&self, review: NewReview) -> Result<Review> {
        let client = self.connect().await?;
        let row = client
            .query_one(
                &format!(
                    "INSERT INTO reviews (username, song_name, artist_name, review_text, date_time)
                     VALUES ($1, $2, $3, $4, now())
                     RETURNING {}",
                    REVIEW_COLUMNS
                ),
                &[
                    &review.username,
                    &review.song_name,
                    &review.artist_name,
                    &review.review_text,
                ],
            )
            .await?;
        Ok(review_from_row(&row))
    }

    async fn update_review_text(&self, id: i64, review_text: &str) -> Result<Option<Review>> {
        let client = self.connect().await?;
        let row = client
            .query_opt(
                &format!(
                    "UPDATE reviews SET review_text = $1 WHERE id = $2 RETURNING {}",
                    REVIEW_COLUMNS
                ),
                &[&review_text, &id],
            )
            .await?;
        Ok(row.as_ref().map(review_from_row))
    }

    async fn delete_review(&self, id: i64) -> Result<bool> {
        let client = self.connect().await?;
        let deleted = client
            .execute("DELETE FROM reviews WHERE id = $1", &[&id])
            .await?;
        Ok(deleted > 0)
    }
}
