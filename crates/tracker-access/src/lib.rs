//! # Tracker Access Control
//!
//! Collaboration-based access control for the tracker API.
//!
//! ## Overview
//!
//! The tracker-access crate handles:
//! - **Verbs**: the operations exposed on every registered kind
//! - **Permission gate**: the decision between allowed, not permitted (401)
//!   and not found (404)
//!
//! Access is never stored on resources. An actor may act on a resource when
//! it holds an *active* collaboration on it, or, on nested routes, when it
//! holds one on the enclosing parent.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tracker_access::{ParentRoute, PermissionGate, Resolution};
//! use tracker_model::{ActorRef, Project, ResourceKind};
//! use tracker_store::MemoryStore;
//!
//! async fn list(store: Arc<MemoryStore>, actor: ActorRef, workspace_id: &str) {
//!     let gate = PermissionGate::new(store);
//!     let route = ParentRoute::new(ResourceKind::Workspace, workspace_id);
//!
//!     match gate.scope::<Project>(&actor, Some(&route)).await.unwrap() {
//!         Resolution::Allowed(projects) => println!("{} projects", projects.len()),
//!         _ => println!("not permitted"),
//!     }
//! }
//! ```

pub mod actions;
pub mod gate;

pub use actions::Verb;
pub use gate::{ParentRoute, PermissionGate, Resolution};
