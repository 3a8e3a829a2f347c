//! JWT token issuing and validation

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::dangerous::insecure_decode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::str::FromStr;

use crate::auth::models::{Claims, IssuedToken, UserIdentity};
use crate::config::AuthConfig;
use crate::error::{AuthFailure, Error, Result};

pub const TOKEN_TYPE: &str = "bearer";

/// Resolve the configured algorithm name, allowing only HMAC variants
fn signing_algorithm(name: &str) -> Result<Algorithm> {
    let algorithm = Algorithm::from_str(name)
        .map_err(|_| Error::Config(format!("Unknown signing algorithm: {}", name)))?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => Err(Error::Config(format!(
            "Signing algorithm {:?} is not supported; use HS256, HS384 or HS512",
            other
        ))),
    }
}

fn signing_secret(config: &AuthConfig) -> Result<&[u8]> {
    if config.secret_key.trim().is_empty() {
        return Err(Error::Config(
            "auth.secret_key is not set (hint: export SONGREVIEWS_SECRET_KEY)".to_string(),
        ));
    }
    Ok(config.secret_key.as_bytes())
}

/// Signs access tokens for verified users
pub struct TokenIssuer {
    key: EncodingKey,
    header: Header,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], algorithm: Algorithm, ttl: Duration) -> Self {
        Self {
            key: EncodingKey::from_secret(secret),
            header: Header::new(algorithm),
            ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let algorithm = signing_algorithm(&config.algorithm)?;
        let secret = signing_secret(config)?;
        if config.token_ttl_minutes <= 0 {
            return Err(Error::Config(
                "auth.token_ttl_minutes must be positive".to_string(),
            ));
        }
        Ok(Self::new(
            secret,
            algorithm,
            Duration::minutes(config.token_ttl_minutes),
        ))
    }

    /// Issue a token valid from now
    pub fn issue(&self, identity: &UserIdentity) -> Result<IssuedToken> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as if it had been created at `issued_at`
    pub fn issue_at(&self, identity: &UserIdentity, issued_at: DateTime<Utc>) -> Result<IssuedToken> {
        let iat = issued_at.timestamp();
        let claims = Claims {
            sub: identity.username.clone(),
            uid: identity.id,
            iat,
            exp: iat + self.ttl.num_seconds(),
        };

        let access_token = encode(&self.header, &claims, &self.key)?;
        tracing::debug!(
            "Issued token for {} expiring in {}s",
            identity.username,
            self.ttl.num_seconds()
        );

        Ok(IssuedToken {
            access_token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: self.ttl.num_seconds(),
        })
    }
}

/// Verifies bearer tokens without consulting any server-side state
pub struct TokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(secret: &[u8], algorithm: Algorithm, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.leeway = leeway_seconds;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let algorithm = signing_algorithm(&config.algorithm)?;
        let secret = signing_secret(config)?;
        Ok(Self::new(secret, algorithm, config.leeway_seconds))
    }

    /// Check signature and expiry, returning the identity the token was issued to
    pub fn validate(&self, token: &str) -> std::result::Result<UserIdentity, AuthFailure> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims.identity())
            .map_err(|e| {
                let failure = classify(token, &e);
                tracing::debug!("Token rejected ({}): {}", failure, e);
                failure
            })
    }
}

/// A token whose header and claims still decode was intact until its signature
/// segment. Any failure besides expiry there is a signature failure.
fn classify(token: &str, err: &jsonwebtoken::errors::Error) -> AuthFailure {
    if matches!(err.kind(), ErrorKind::ExpiredSignature) {
        return AuthFailure::Expired;
    }
    if signed_part_decodes(token) {
        AuthFailure::BadSignature
    } else {
        AuthFailure::Malformed
    }
}

fn signed_part_decodes(token: &str) -> bool {
    let mut segments = token.splitn(3, '.');
    let (Some(header), Some(payload), Some(_)) = (segments.next(), segments.next(), segments.next())
    else {
        return false;
    };
    // The signature segment may itself contain stray dots after tampering
    insecure_decode::<Claims>(format!("{}.{}.", header, payload)).is_ok()
}
