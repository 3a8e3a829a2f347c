//! Authentication models

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::User;

/// Who a request is acting as, once credentials or a token have been checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: i64,
    pub username: String,
}

impl From<&User> for UserIdentity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// User ID
    pub uid: i64,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

impl Claims {
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.uid,
            username: self.sub.clone(),
        }
    }
}

/// Form body of `POST /token`
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Successful `POST /token` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
}

/// JSON body of `POST /auth`
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(Error::Validation("username must not be empty".to_string()));
        }
        if self.password.is_empty() {
            return Err(Error::Validation("password must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_from_claims() {
        let claims = Claims {
            sub: "alice".to_string(),
            uid: 7,
            iat: 0,
            exp: 9999999999,
        };
        assert_eq!(
            claims.identity(),
            UserIdentity {
                id: 7,
                username: "alice".to_string()
            }
        );
    }

    #[test]
    fn test_register_validation() {
        let ok = RegisterRequest {
            username: "alice".to_string(),
            password: "pw123".to_string(),
        };
        assert!(ok.validate().is_ok());

        let blank_name = RegisterRequest {
            username: " ".to_string(),
            password: "pw123".to_string(),
        };
        assert!(matches!(blank_name.validate(), Err(Error::Validation(_))));

        let blank_password = RegisterRequest {
            username: "alice".to_string(),
            password: String::new(),
        };
        assert!(matches!(blank_password.validate(), Err(Error::Validation(_))));
    }
}
