//! Persistence for users and reviews
//!
//! Every operation acquires its own connection and releases it before
//! returning, so no connection outlives the request that needed it.

mod models;
mod postgres;
mod sqlite;

pub use models::*;
pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::error::Result;

/// Upper bound applied to `limit` when listing reviews
pub const MAX_PAGE_SIZE: i64 = 1000;

#[async_trait]
pub trait Store: Send + Sync {
    /// Create tables that don't exist yet
    async fn init(&self) -> Result<()>;

    /// Insert a user. Fails with `Error::UsernameTaken` if the name is in use.
    async fn create_user(&self, user: NewUser) -> Result<User>;

    async fn find_user(&self, username: &str) -> Result<Option<User>>;

    async fn list_reviews(&self, skip: i64, limit: i64) -> Result<Vec<Review>>;

    async fn get_review(&self, id: i64) -> Result<Option<Review>>;

    async fn create_review(&self, review: NewReview) -> Result<Review>;

    /// Replace the text of a review, returning the updated row if it exists
    async fn update_review_text(&self, id: i64, review_text: &str) -> Result<Option<Review>>;

    /// Returns false when no review had that id
    async fn delete_review(&self, id: i64) -> Result<bool>;
}

pub type SharedStore = Arc<dyn Store>;

/// Build the configured store and make sure its tables exist
pub async fn open_store(config: &DatabaseConfig) -> Result<SharedStore> {
    let store: SharedStore = match config {
        DatabaseConfig::Sqlite { path } => {
            tracing::info!("Using SQLite database at {}", path.display());
            Arc::new(SqliteStore::new(path))
        }
        DatabaseConfig::Postgres { url } => {
            tracing::info!("Using PostgreSQL database");
            Arc::new(PostgresStore::new(url))
        }
    };
    store.init().await?;
    Ok(store)
}

/// Clamp client-supplied paging values to something the database accepts
pub(crate) fn clamp_page(skip: i64, limit: i64) -> (i64, i64) {
    (skip.max(0), limit.clamp(0, MAX_PAGE_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 100), (0, 100));
        assert_eq!(clamp_page(-5, 10), (0, 10));
        assert_eq!(clamp_page(3, 5000), (3, MAX_PAGE_SIZE));
        assert_eq!(clamp_page(3, -1), (3, 0));
    }
}
