//! JWT claims for API sessions

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracker_model::{ActorRef, User};
use uuid::Uuid;

/// Claims carried by a bearer token.
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use tracker_auth::SessionClaims;
/// use tracker_model::User;
///
/// let user = User::new("yoda@dagobah.com", "Yoda", "the Great One");
/// let claims = SessionClaims::for_user(&user, "terrible-tracker", Duration::hours(24));
///
/// assert_eq!(claims.user_id(), Some(user.id));
/// assert!(!claims.is_expired());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    // Standard JWT claims (RFC 7519)
    /// Subject (user ID)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,

    /// User email
    pub email: String,

    /// User display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SessionClaims {
    /// Create claims for a user id.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's unique identifier
    /// * `email` - The user's email address
    /// * `issuer` - Token issuer
    /// * `duration` - Token validity duration, saturating at the representable range
    pub fn new(user_id: Uuid, email: impl Into<String>, issuer: impl Into<String>, duration: Duration) -> Self {
        let now = Utc::now();
        let expires = now.checked_add_signed(duration).unwrap_or(if duration < Duration::zero() {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        });
        Self {
            sub: user_id.to_string(),
            iss: issuer.into(),
            exp: expires.timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            jti: Uuid::now_v7().to_string(),
            email: email.into(),
            name: None,
        }
    }

    /// Create claims for `user`, including their display name.
    pub fn for_user(user: &User, issuer: impl Into<String>, duration: Duration) -> Self {
        Self::new(user.id, user.email.clone(), issuer, duration).with_name(user.display_name())
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parse the subject as a user id.
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    /// The subject as an actor reference.
    pub fn actor(&self) -> Option<ActorRef> {
        self.user_id().map(ActorRef::user)
    }

    /// Check if the token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Expiration as a timestamp.
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_else(Utc::now)
    }
}
