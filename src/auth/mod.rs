//! Authentication: credential checks, token issuing and validation

pub mod credentials;
pub mod jwt;
pub mod middleware;
pub mod models;

pub use credentials::CredentialVerifier;
pub use jwt::{TokenIssuer, TokenValidator};
pub use middleware::{identity_from_headers, require_auth};
pub use models::{Claims, IssuedToken, UserIdentity};
