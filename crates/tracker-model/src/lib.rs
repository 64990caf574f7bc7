//! # Tracker Domain Model
//!
//! Entities shared by every tracker crate: users, the collaboratable
//! resources they work on, and the collaboration records that link them.
//!
//! ## Overview
//!
//! - **Users**: the actors making requests
//! - **Projects**: titled work items, optionally nested in a workspace
//! - **Workspaces**: named groups of projects
//! - **Collaborations**: actor ↔ resource links carrying a role and a state
//!
//! ## Architecture
//!
//! ```text
//! User
//!   └─ Collaboration (role, state) ─→ Workspace
//!   └─ Collaboration (role, state) ─→ Project ─(workspace_id)─→ Workspace
//! ```
//!
//! Resources never record who may see them. Visibility is derived from the
//! collaboration records pointing at them.
//!
//! ## Usage
//!
//! ```rust
//! use tracker_model::{Collaboratable, Collaboration, Project, User};
//!
//! let user = User::new("yoda@dagobah.com", "Yoda", "the Great One");
//! let project = Project::new("The first project");
//!
//! let owner = Collaboration::ownership(user.actor(), project.reference());
//! assert!(owner.is_owner());
//! ```

pub mod collaboratable;
pub mod collaboration;
pub mod kind;
pub mod project;
pub mod roles;
pub mod user;
pub mod validation;
pub mod workspace;

pub use collaboratable::Collaboratable;
pub use collaboration::Collaboration;
pub use kind::{ActorKind, ActorRef, ResourceKind, ResourceRef};
pub use project::Project;
pub use roles::{CollaborationState, Role};
pub use user::User;
pub use validation::{Attributes, FieldValue, ValidationErrors};
pub use workspace::Workspace;
