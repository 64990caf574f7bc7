//! # Tracker Authentication
//!
//! Bearer-token sessions for the tracker API.
//!
//! ## Overview
//!
//! The tracker-auth crate handles:
//! - **Claims**: the session payload (`sub` is the user id)
//! - **JWT**: issuing and validating HS256 tokens
//! - **Errors**: authentication failures with HTTP status mapping
//!
//! Resolving the token's subject to a stored user is left to the caller,
//! which owns the actor store.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tracker_auth::{jwt::bearer_token, JwtService};
//! use tracker_model::User;
//!
//! let service = JwtService::with_secret("your-secret-key-at-least-32-chars").unwrap();
//! let user = User::new("yoda@dagobah.com", "Yoda", "the Great One");
//!
//! let token = service.issue_token(&user).unwrap();
//! let header = format!("Bearer {}", token);
//!
//! let claims = service.validate_token(bearer_token(&header).unwrap()).unwrap();
//! assert_eq!(claims.user_id(), Some(user.id));
//! ```
//!
//! ## Feature Flags
//!
//! - `jwt` (default): token signing and validation via `jsonwebtoken`

pub mod claims;
pub mod error;
pub mod jwt;

pub use claims::SessionClaims;
pub use error::{AuthError, AuthResult};
pub use jwt::{JwtConfig, JwtService};
