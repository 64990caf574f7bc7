//! Collaboration roles and states
//!
//! Roles are open-ended labels; only `owner` is ever assigned automatically.
//! States track whether a collaboration has been accepted: only `active`
//! collaborations grant access.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role carried by a collaboration record.
///
/// Role names are open strings. The two names the system knows about are
/// [`Role::OWNER`], assigned to the creator of a resource, and
/// [`Role::COLLABORATOR`], the default for shared access.
///
/// # Examples
///
/// ```
/// use tracker_model::Role;
///
/// assert_eq!(Role::default().as_str(), "collaborator");
/// assert!(Role::owner().is_owner());
/// assert!(!Role::new("reviewer").is_owner());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Role name of a resource owner.
    pub const OWNER: &'static str = "owner";

    /// Default role name.
    pub const COLLABORATOR: &'static str = "collaborator";

    /// Creates a role with an arbitrary name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The owner role.
    pub fn owner() -> Self {
        Self::new(Self::OWNER)
    }

    /// The default collaborator role.
    pub fn collaborator() -> Self {
        Self::new(Self::COLLABORATOR)
    }

    /// Get the role name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if this is the owner role.
    pub fn is_owner(&self) -> bool {
        self.0 == Self::OWNER
    }

    /// A blank role name counts as a missing role.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::collaborator()
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of a collaboration record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollaborationState {
    /// Invited but not yet accepted; grants no access.
    #[default]
    Pending,

    /// Accepted; grants access to the collaboratable.
    Active,
}

impl CollaborationState {
    /// Get the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
        }
    }

    /// Check if this state grants access.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for CollaborationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_defaults_to_collaborator() {
        assert_eq!(Role::default(), Role::collaborator());
        assert_eq!(Role::default().as_str(), "collaborator");
    }

    #[test]
    fn test_role_is_open_string() {
        let role = Role::from("maintainer");
        assert_eq!(role.to_string(), "maintainer");
        assert!(!role.is_owner());
        assert!(!role.is_blank());
        assert!(Role::new("  ").is_blank());
    }

    #[test]
    fn test_role_serializes_as_plain_string() {
        let json = serde_json::to_value(Role::owner()).unwrap();
        assert_eq!(json, serde_json::json!("owner"));
    }

    #[test]
    fn test_state_defaults_to_pending() {
        assert_eq!(CollaborationState::default(), CollaborationState::Pending);
        assert!(!CollaborationState::Pending.is_active());
        assert!(CollaborationState::Active.is_active());
    }

    #[test]
    fn test_state_names() {
        assert_eq!(CollaborationState::Active.to_string(), "active");
        assert_eq!(
            serde_json::to_value(CollaborationState::Pending).unwrap(),
            serde_json::json!("pending")
        );
    }
}
