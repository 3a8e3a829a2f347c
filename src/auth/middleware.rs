//! Bearer token middleware

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::api::SharedState;
use crate::auth::jwt::TokenValidator;
use crate::auth::models::UserIdentity;
use crate::error::{AuthFailure, Error};

/// Resolve the identity behind an `Authorization: Bearer <token>` header
pub fn identity_from_headers(
    headers: &HeaderMap,
    validator: &TokenValidator,
) -> Result<UserIdentity, AuthFailure> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthFailure::MissingToken)?
        .to_str()
        .map_err(|_| AuthFailure::Malformed)?;

    let (scheme, token) = value.split_once(' ').ok_or(AuthFailure::MissingToken)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthFailure::MissingToken);
    }

    validator.validate(token.trim())
}

/// Middleware for requiring authentication.
///
/// On success the caller's [`UserIdentity`] is available to handlers through
/// `Extension<UserIdentity>`.
pub async fn require_auth(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Error> {
    let identity = identity_from_headers(req.headers(), &state.validator)?;
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::TokenIssuer;
    use axum::http::HeaderValue;
    use jsonwebtoken::Algorithm;

    const SECRET: &[u8] = b"middleware-secret";

    fn validator() -> TokenValidator {
        TokenValidator::new(SECRET, Algorithm::HS256, 0)
    }

    fn bearer(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_no_header() {
        let result = identity_from_headers(&HeaderMap::new(), &validator());
        assert_eq!(result, Err(AuthFailure::MissingToken));
    }

    #[test]
    fn test_wrong_scheme() {
        let result = identity_from_headers(&bearer("Basic YWxpY2U6cHcxMjM="), &validator());
        assert_eq!(result, Err(AuthFailure::MissingToken));
    }

    #[test]
    fn test_valid_bearer() {
        let identity = UserIdentity {
            id: 3,
            username: "alice".to_string(),
        };
        let issuer = TokenIssuer::new(SECRET, Algorithm::HS256, chrono::Duration::minutes(5));
        let token = issuer.issue(&identity).unwrap();

        let headers = bearer(&format!("Bearer {}", token.access_token));
        assert_eq!(identity_from_headers(&headers, &validator()), Ok(identity.clone()));

        let lowercase = bearer(&format!("bearer {}", token.access_token));
        assert_eq!(identity_from_headers(&lowercase, &validator()), Ok(identity));
    }

    #[test]
    fn test_garbage_token() {
        let result = identity_from_headers(&bearer("Bearer garbage"), &validator());
        assert_eq!(result, Err(AuthFailure::Malformed));
    }
}
