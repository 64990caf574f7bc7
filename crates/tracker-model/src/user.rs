//! User accounts
//!
//! Users are the only actor kind. Account management happens outside the API;
//! users are created by seeding or by embedding code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::kind::ActorRef;
use crate::validation::{is_blank, ValidationErrors, BLANK};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Login email
    pub email: String,

    /// Given name
    pub first: String,

    /// Family name
    pub last: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracker_model::User;
    ///
    /// let user = User::new("yoda@dagobah.com", "Yoda", "the Great One");
    /// assert_eq!(user.display_name(), "Yoda the Great One");
    /// assert!(user.validate().is_ok());
    /// ```
    pub fn new(email: impl Into<String>, first: impl Into<String>, last: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            email: email.into(),
            first: first.into(),
            last: last.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reference to this user as a collaborator.
    pub fn actor(&self) -> ActorRef {
        ActorRef::user(self.id)
    }

    /// Full name for display.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first, self.last)
    }

    /// Email, first and last name are required.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (field, value) in [("email", &self.email), ("first", &self.first), ("last", &self.last)] {
            if is_blank(value) {
                errors.add(field, BLANK);
            }
        }
        errors.into_result()
    }
}
