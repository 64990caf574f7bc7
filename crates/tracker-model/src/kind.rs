//! Resource kinds and tagged references
//!
//! Collaboration records point at actors and resources of different kinds.
//! Instead of a free-form type string, each side is a tagged reference
//! (`kind` + `id`) over a closed set of kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Resource kinds that can be enrolled in the collaboration system.
///
/// # Examples
///
/// ```
/// use tracker_model::ResourceKind;
///
/// assert_eq!(ResourceKind::Project.as_str(), "project");
/// assert_eq!(ResourceKind::Project.plural(), "projects");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A project, optionally nested in a workspace.
    Project,
    /// A workspace grouping projects.
    Workspace,
}

impl ResourceKind {
    /// Singular name, also used as the request body wrapper key.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Project => "project",
            ResourceKind::Workspace => "workspace",
        }
    }

    /// Plural name, used as the route segment.
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Project => "projects",
            ResourceKind::Workspace => "workspaces",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds of actors that can hold collaborations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// A registered user.
    #[default]
    User,
}

impl ActorKind {
    /// Get the string representation of the actor kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorKind::User => "user",
        }
    }
}

/// Tagged reference to a collaboratable resource.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    /// Kind of the referenced resource
    pub kind: ResourceKind,

    /// Identifier within that kind
    pub id: Uuid,
}

impl ResourceRef {
    /// Creates a reference to the resource `id` of `kind`.
    pub fn new(kind: ResourceKind, id: Uuid) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.id)
    }
}

/// Tagged reference to an actor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ActorRef {
    /// Kind of the referenced actor
    #[serde(default)]
    pub kind: ActorKind,

    /// Identifier of the actor
    pub id: Uuid,
}

impl ActorRef {
    /// Reference to the user `id`.
    pub fn user(id: Uuid) -> Self {
        Self {
            kind: ActorKind::User,
            id,
        }
    }
}

impl fmt::Display for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.id)
    }
}
