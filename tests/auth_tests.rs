//! Authentication core tests
//! Credential verification, token issuing and token validation against a
//! real SQLite store in a temporary directory.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::Algorithm;
use songreviews::auth::{CredentialVerifier, TokenIssuer, TokenValidator, UserIdentity};
use songreviews::store::{SqliteStore, Store};
use songreviews::{AuthFailure, Error};
use tempfile::TempDir;

const SECRET: &[u8] = b"auth-tests-secret";

const USERS: &[(&str, &str)] = &[
    ("alice", "pw123"),
    ("bob", "correct horse battery staple"),
    ("carol", "ünïcødé-pässwörd"),
    ("dave", " "),
];

async fn create_verifier() -> (CredentialVerifier, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = SqliteStore::new(dir.path().join("auth.db"));
    store.init().await.expect("Failed to init store");
    let verifier = CredentialVerifier::new(Arc::new(store), 4).expect("Failed to build verifier");
    (verifier, dir)
}

fn token_pair() -> (TokenIssuer, TokenValidator) {
    (
        TokenIssuer::new(SECRET, Algorithm::HS256, Duration::minutes(30)),
        TokenValidator::new(SECRET, Algorithm::HS256, 0),
    )
}

fn identity(id: i64, username: &str) -> UserIdentity {
    UserIdentity {
        id,
        username: username.to_string(),
    }
}

#[tokio::test]
async fn test_registered_users_verify() {
    let (verifier, _dir) = create_verifier().await;

    let mut registered = Vec::new();
    for (username, password) in USERS {
        registered.push(verifier.register(username, password).await.unwrap());
    }

    for ((username, password), expected) in USERS.iter().zip(&registered) {
        let identity = verifier.verify(username, password).await.unwrap();
        assert_eq!(&identity, expected);
        assert_eq!(identity.username, *username);
    }
}

#[tokio::test]
async fn test_wrong_password_is_bad_credential() {
    let (verifier, _dir) = create_verifier().await;
    for (username, password) in USERS {
        verifier.register(username, password).await.unwrap();
    }

    for (username, password) in USERS {
        let extended = format!("{}x", password);
        for wrong in ["", "pw1234", "PW123", extended.as_str()] {
            let err = verifier.verify(username, wrong).await.unwrap_err();
            assert!(
                matches!(err, Error::Auth(AuthFailure::BadCredential)),
                "{username}/{wrong}: {err}"
            );
        }
    }
}

#[tokio::test]
async fn test_unregistered_user_is_not_found() {
    let (verifier, _dir) = create_verifier().await;
    verifier.register("alice", "pw123").await.unwrap();

    for username in ["bob", "Alice", "alice ", ""] {
        let err = verifier.verify(username, "pw123").await.unwrap_err();
        assert!(matches!(err, Error::Auth(AuthFailure::NotFound)), "{username}");
    }
}

#[tokio::test]
async fn test_duplicate_registration_is_distinct_error() {
    let (verifier, _dir) = create_verifier().await;
    verifier.register("alice", "pw123").await.unwrap();

    let err = verifier.register("alice", "another").await.unwrap_err();
    assert!(matches!(err, Error::UsernameTaken(ref name) if name == "alice"));

    // The first password still works
    assert!(verifier.verify("alice", "pw123").await.is_ok());
}

#[test]
fn test_round_trip() {
    let (issuer, validator) = token_pair();
    for (id, username) in [(1, "alice"), (2, "bob"), (99, "ünïcødé")] {
        let who = identity(id, username);
        let token = issuer.issue(&who).unwrap();
        assert_eq!(validator.validate(&token.access_token), Ok(who));
    }
}

#[test]
fn test_expired_token_rejected() {
    let (issuer, validator) = token_pair();
    let token = issuer
        .issue_at(&identity(1, "alice"), Utc::now() - Duration::hours(2))
        .unwrap();
    assert_eq!(validator.validate(&token.access_token), Err(AuthFailure::Expired));
}

#[test]
fn test_token_just_inside_window_accepted() {
    let (issuer, validator) = token_pair();
    let token = issuer
        .issue_at(&identity(1, "alice"), Utc::now() - Duration::minutes(29))
        .unwrap();
    assert!(validator.validate(&token.access_token).is_ok());
}

#[test]
fn test_tampered_signature_rejected() {
    let (issuer, validator) = token_pair();
    let token = issuer.issue(&identity(1, "alice")).unwrap().access_token;

    let sig_start = token.rfind('.').unwrap() + 1;
    let signature = token[sig_start..].as_bytes();

    // Bits 0..7 keep every byte ASCII, including the padding bits of the last character
    for i in 0..signature.len() {
        for bit in 0..7 {
            let mut tampered = signature.to_vec();
            tampered[i] ^= 1 << bit;
            let forged = format!(
                "{}{}",
                &token[..sig_start],
                String::from_utf8(tampered).unwrap()
            );

            assert_eq!(
                validator.validate(&forged),
                Err(AuthFailure::BadSignature),
                "byte {i} bit {bit}: {forged}"
            );
        }
    }
}

#[test]
fn test_swapped_payload_rejected() {
    let (issuer, validator) = token_pair();
    let alice = issuer.issue(&identity(1, "alice")).unwrap().access_token;
    let bob = issuer.issue(&identity(2, "bob")).unwrap().access_token;

    let bob_body = &bob[..bob.rfind('.').unwrap()];
    let alice_sig = &alice[alice.rfind('.').unwrap()..];
    let forged = format!("{}{}", bob_body, alice_sig);

    assert_eq!(validator.validate(&forged), Err(AuthFailure::BadSignature));
}

#[test]
fn test_malformed_token_rejected() {
    let (_, validator) = token_pair();
    assert_eq!(validator.validate("not-a-jwt-token"), Err(AuthFailure::Malformed));
    assert_eq!(validator.validate("invalid.token.here"), Err(AuthFailure::Malformed));
}

#[test]
fn test_validation_is_stateless() {
    let (issuer, validator) = token_pair();
    let token = issuer.issue(&identity(5, "erin")).unwrap().access_token;

    let other_validator = TokenValidator::new(SECRET, Algorithm::HS256, 0);
    for _ in 0..3 {
        assert_eq!(validator.validate(&token), other_validator.validate(&token));
    }
}
