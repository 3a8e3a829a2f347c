//! Rows stored in the database and the values used to create them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// bcrypt hash - never serialize
    #[serde(skip_serializing)]
    pub hashed_password: String,
}

/// Fields needed to insert a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub hashed_password: String,
}

/// A short text review of a song
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: i64,
    pub username: String,
    pub song_name: String,
    pub artist_name: String,
    pub review_text: String,
    pub date_time: DateTime<Utc>,
}

/// Fields needed to insert a review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
    pub username: String,
    pub song_name: String,
    pub artist_name: String,
    pub review_text: String,
}

impl NewReview {
    /// Reject reviews with blank fields
    pub fn validate(&self) -> crate::error::Result<()> {
        for (field, value) in [
            ("username", &self.username),
            ("song_name", &self.song_name),
            ("artist_name", &self.artist_name),
            ("review_text", &self.review_text),
        ] {
            if value.trim().is_empty() {
                return Err(crate::error::Error::Validation(format!(
                    "{} must not be empty",
                    field
                )));
            }
        }
        Ok(())
    }
}
