//! # Tracker Store
//!
//! Persistence seams for the tracker API.
//!
//! ## Overview
//!
//! The tracker-store crate handles:
//! - **Resource stores**: per-kind CRUD plus actor-scoped and parent-scoped listing
//! - **Collaboration ledger**: collaboration records and capability checks
//! - **Actor store**: user accounts, with cascading deletes
//! - **Catalog**: kind-erased existence checks used to tell 401 from 404
//! - **Query builder**: collection filters as in-memory predicates or SQL
//!
//! ## Features
//!
//! - `memory` (default): [`MemoryStore`], a single-process store for
//!   development and tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tracker_model::{Collaboratable, Collaboration, Project, User};
//! use tracker_store::{
//!     ActorStore, MemoryStore, Predicate, QueryParams, ResourceStore, StoreResult,
//! };
//!
//! async fn example() -> StoreResult<()> {
//!     let store = MemoryStore::new();
//!     let user = store.insert_user(User::new("yoda@dagobah.com", "Yoda", "the Great One")).await?;
//!
//!     let project = Project::new("The first project");
//!     let owner = Collaboration::ownership(user.actor(), project.reference());
//!     store.insert_owned(project, owner).await?;
//!
//!     let params = QueryParams::new().with("title", "first").with("fuzzy", "true");
//!     let predicate = Predicate::build(&params, &["title", "description"]);
//!     let visible: Vec<Project> = store.visible_to(&user.actor()).await?;
//!     assert_eq!(predicate.filter(visible).len(), 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Consistency
//!
//! Every operation is a point-in-time snapshot. Writes touching several
//! records (a resource and its owner, a delete and its cascade) are atomic.

pub mod error;
pub mod ledger;
#[cfg(feature = "memory")]
pub mod memory;
pub mod query;
pub mod repository;

pub use error::{StoreError, StoreResult};
pub use ledger::CollaborationLedger;
#[cfg(feature = "memory")]
pub use memory::MemoryStore;
pub use query::{Condition, Matcher, Predicate, QueryParams};
pub use repository::{ActorStore, Catalog, ResourceStore};
