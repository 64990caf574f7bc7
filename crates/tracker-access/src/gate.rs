//! # Permission Gate
//!
//! Decides whether an actor may touch a resource, and when not, whether to
//! answer "not permitted" or "not found".
//!
//! ## Decision
//!
//! ```text
//! nested route? ── parent not visible to actor ──────────────→ NotPermitted
//!      │
//! id not a UUID ─────────────────────────────────────────────→ NotFound
//!      │
//! resource in scope (visible, or child of the visible parent) → Allowed
//!      │
//! resource exists elsewhere ─────────────────────────────────→ NotPermitted
//!      │
//! otherwise ─────────────────────────────────────────────────→ NotFound
//! ```
//!
//! An existing resource never resolves to NotFound. A missing one only
//! resolves to NotPermitted when its parent is not visible, so a nested
//! route never reveals whether the parent exists.

use std::sync::Arc;
use tracing::{debug, warn};
use tracker_model::{ActorRef, Collaboratable, ResourceKind, ResourceRef};
use tracker_store::{Catalog, CollaborationLedger, ResourceStore, StoreResult};
use uuid::Uuid;

use crate::actions::Verb;

/// Outcome of a permission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    /// The actor may proceed with the value.
    Allowed(T),
    /// The target exists (or is hidden behind a parent) but the actor may not touch it.
    NotPermitted,
    /// The target does not exist.
    NotFound,
}

/// The enclosing resource named by a nested route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRoute {
    /// Kind of the parent
    pub kind: ResourceKind,

    /// Identifier as it appeared in the path
    pub raw_id: String,
}

impl ParentRoute {
    /// Creates a parent route.
    pub fn new(kind: ResourceKind, raw_id: impl Into<String>) -> Self {
        Self {
            kind,
            raw_id: raw_id.into(),
        }
    }
}

/// Permission gate over a store.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use tracker_access::{PermissionGate, Resolution, Verb};
/// use tracker_model::{ActorRef, Project};
/// use tracker_store::MemoryStore;
///
/// async fn show(store: Arc<MemoryStore>, actor: ActorRef, id: &str) {
///     let gate = PermissionGate::new(store);
///     match gate.resolve::<Project>(&actor, Verb::Show, id, None).await.unwrap() {
///         Resolution::Allowed(project) => println!("{}", project.title),
///         Resolution::NotPermitted => println!("401"),
///         Resolution::NotFound => println!("404"),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct PermissionGate<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for PermissionGate<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> PermissionGate<S>
where
    S: CollaborationLedger + Catalog + ?Sized,
{
    /// Create a gate over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Resolve the parent of a nested route.
    ///
    /// # Returns
    ///
    /// The parent reference if it exists and `actor` actively collaborates on
    /// it, `None` otherwise (including malformed ids).
    pub async fn parent(&self, actor: &ActorRef, route: &ParentRoute) -> StoreResult<Option<ResourceRef>> {
        let Ok(id) = Uuid::parse_str(&route.raw_id) else {
            debug!(parent = %route.kind, raw_id = %route.raw_id, "Malformed parent id");
            return Ok(None);
        };
        let parent = ResourceRef::new(route.kind, id);

        if self.store.is_collaborator(actor, &parent).await? && self.store.exists(&parent).await? {
            Ok(Some(parent))
        } else {
            debug!(%actor, %parent, "Parent not visible");
            Ok(None)
        }
    }

    /// The collection `actor` may list.
    ///
    /// Flat routes yield the resources the actor actively collaborates on.
    /// Nested routes yield every child of the parent, or
    /// [`Resolution::NotPermitted`] when the parent is not visible.
    pub async fn scope<T>(&self, actor: &ActorRef, parent: Option<&ParentRoute>) -> StoreResult<Resolution<Vec<T>>>
    where
        T: Collaboratable,
        S: ResourceStore<T>,
    {
        match parent {
            Some(route) => match self.parent(actor, route).await? {
                Some(parent) => Ok(Resolution::Allowed(
                    ResourceStore::<T>::children_of(&*self.store, &parent).await?,
                )),
                None => {
                    warn!(%actor, kind = %T::KIND, parent = %route.kind, "Denied nested collection");
                    Ok(Resolution::NotPermitted)
                }
            },
            None => Ok(Resolution::Allowed(
                ResourceStore::<T>::visible_to(&*self.store, actor).await?,
            )),
        }
    }

    /// Resolve one member for `verb`.
    pub async fn resolve<T>(
        &self,
        actor: &ActorRef,
        verb: Verb,
        raw_id: &str,
        parent: Option<&ParentRoute>,
    ) -> StoreResult<Resolution<T>>
    where
        T: Collaboratable,
        S: ResourceStore<T>,
    {
        let parent = match parent {
            Some(route) => match self.parent(actor, route).await? {
                Some(parent) => Some(parent),
                None => {
                    warn!(%actor, %verb, kind = %T::KIND, parent = %route.kind, "Denied: parent not visible");
                    return Ok(Resolution::NotPermitted);
                }
            },
            None => None,
        };

        let Ok(id) = Uuid::parse_str(raw_id) else {
            debug!(%verb, kind = %T::KIND, raw_id, "Malformed id");
            return Ok(Resolution::NotFound);
        };

        let Some(resource) = ResourceStore::<T>::fetch(&*self.store, id).await? else {
            debug!(%verb, kind = %T::KIND, %id, "Not found");
            return Ok(Resolution::NotFound);
        };

        let in_scope = match parent {
            Some(parent) => resource.parent() == Some(parent),
            None => {
                self.store
                    .is_collaborator(actor, &resource.reference())
                    .await?
            }
        };

        if in_scope {
            debug!(%actor, %verb, kind = %T::KIND, %id, "Allowed");
            Ok(Resolution::Allowed(resource))
        } else {
            warn!(%actor, %verb, kind = %T::KIND, %id, "Denied: no active collaboration");
            Ok(Resolution::NotPermitted)
        }
    }
}
