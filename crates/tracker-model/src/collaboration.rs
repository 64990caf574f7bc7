//! Collaboration records
//!
//! A collaboration links one actor to one collaboratable resource with a role
//! and a state. Visibility of every resource is derived from these records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::kind::{ActorRef, ResourceRef};
use crate::roles::{CollaborationState, Role};
use crate::validation::{ValidationErrors, BLANK};

/// Link between an actor and a collaboratable resource.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use tracker_model::{ActorRef, Collaboration, CollaborationState, ResourceKind, ResourceRef};
///
/// let user = ActorRef::user(Uuid::now_v7());
/// let project = ResourceRef::new(ResourceKind::Project, Uuid::now_v7());
///
/// let invite = Collaboration::new(user, project);
/// assert_eq!(invite.role.as_str(), "collaborator");
/// assert_eq!(invite.state, CollaborationState::Pending);
///
/// let owner = Collaboration::ownership(user, project);
/// assert!(owner.is_owner());
/// assert!(owner.is_active());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaboration {
    /// Unique collaboration ID
    pub id: Uuid,

    /// Actor holding the collaboration
    pub collaborator: ActorRef,

    /// Resource the collaboration grants access to
    pub collaboratable: ResourceRef,

    /// Role of the collaborator on the resource
    #[serde(default)]
    pub role: Role,

    /// Whether the collaboration has been accepted
    #[serde(default)]
    pub state: CollaborationState,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

impl Collaboration {
    /// Creates a pending collaboration with the default role.
    ///
    /// # Arguments
    ///
    /// * `collaborator` - The actor being granted access
    /// * `collaboratable` - The resource access is granted to
    pub fn new(collaborator: ActorRef, collaboratable: ResourceRef) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            collaborator,
            collaboratable,
            role: Role::default(),
            state: CollaborationState::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates the active owner collaboration recorded when `collaborator`
    /// creates `collaboratable`.
    pub fn ownership(collaborator: ActorRef, collaboratable: ResourceRef) -> Self {
        Self::new(collaborator, collaboratable)
            .with_role(Role::owner())
            .with_state(CollaborationState::Active)
    }

    /// Set the role.
    pub fn with_role(mut self, role: impl Into<Role>) -> Self {
        self.role = role.into();
        self
    }

    /// Set the state.
    pub fn with_state(mut self, state: CollaborationState) -> Self {
        self.state = state;
        self
    }

    /// Check if the collaboration grants access.
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Check if the collaborator owns the resource.
    pub fn is_owner(&self) -> bool {
        self.role.is_owner()
    }

    /// Check if this record links `actor` to `resource`.
    pub fn involves(&self, actor: &ActorRef, resource: &ResourceRef) -> bool {
        self.collaborator == *actor && self.collaboratable == *resource
    }

    /// Validate the record before it is persisted.
    ///
    /// The references are typed and always present; only the role can be
    /// missing.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.role.is_blank() {
            errors.add("role", BLANK);
        }
        errors.into_result()
    }
}
