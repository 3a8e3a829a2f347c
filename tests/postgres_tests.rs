//! PostgreSQL store tests
//!
//! These tests require a reachable PostgreSQL server.
//! Run with: SONGREVIEWS_TEST_POSTGRES_URL="host=localhost user=postgres password=postgres dbname=songreviews_test" \
//!     cargo test --test postgres_tests -- --ignored --test-threads=1

use songreviews::store::{NewReview, NewUser, PostgresStore, Store};
use songreviews::Error;

fn test_store() -> PostgresStore {
    let url = std::env::var("SONGREVIEWS_TEST_POSTGRES_URL")
        .expect("SONGREVIEWS_TEST_POSTGRES_URL must be set");
    PostgresStore::new(url)
}

#[tokio::test]
#[ignore]
async fn test_postgres_user_round_trip() {
    let store = test_store();
    store.init().await.expect("Failed to init schema");

    let username = format!("user_{}", uuid::Uuid::new_v4().simple());
    let created = store
        .create_user(NewUser {
            username: username.clone(),
            hashed_password: "hash".to_string(),
        })
        .await
        .unwrap();

    let found = store.find_user(&username).await.unwrap().unwrap();
    assert_eq!(found.id, created.id);

    let duplicate = store
        .create_user(NewUser {
            username,
            hashed_password: "hash".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(duplicate, Error::UsernameTaken(_)));
}

#[tokio::test]
#[ignore]
async fn test_postgres_review_lifecycle() {
    let store = test_store();
    store.init().await.expect("Failed to init schema");

    let review = store
        .create_review(NewReview {
            username: "alice".to_string(),
            song_name: "Teardrop".to_string(),
            artist_name: "Massive Attack".to_string(),
            review_text: "Hypnotic".to_string(),
        })
        .await
        .unwrap();

    let updated = store
        .update_review_text(review.id, "Still hypnotic")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.review_text, "Still hypnotic");

    assert!(store.delete_review(review.id).await.unwrap());
    assert!(store.get_review(review.id).await.unwrap().is_none());
}
