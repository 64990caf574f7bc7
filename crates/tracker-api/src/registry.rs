//! Registry of the resource kinds served by the API
//!
//! Route names map to handlers through an explicit table built at startup;
//! nothing is derived from type names at runtime.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use tracker_access::ParentRoute;
use tracker_model::{Project, ResourceKind, Workspace};
use tracker_store::{Catalog, CollaborationLedger, ResourceStore};

use crate::controller::{ResourceController, ResourceHandler};
use crate::error::{ApiError, ApiResult};

/// How a resource kind is exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    /// Kind served
    pub kind: ResourceKind,

    /// Kind the collection may be nested under
    pub parent: Option<ResourceKind>,

    /// Fields usable as query filters
    pub queryable: Vec<&'static str>,

    /// Fields accepted on create and update
    pub permitted: Vec<&'static str>,

    /// Whether creation records an owner collaboration
    pub collaboratable: bool,
}

impl Registration {
    /// Register `kind` as a flat, collaboration-enabled collection.
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            parent: None,
            queryable: Vec::new(),
            permitted: Vec::new(),
            collaboratable: true,
        }
    }

    /// Allow nesting under `parent`.
    pub fn nested_in(mut self, parent: ResourceKind) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the query filter fields.
    pub fn with_queryable(mut self, fields: &[&'static str]) -> Self {
        self.queryable = fields.to_vec();
        self
    }

    /// Set the writable fields.
    pub fn with_permitted(mut self, fields: &[&'static str]) -> Self {
        self.permitted = fields.to_vec();
        self
    }

    /// Enable or disable the owner collaboration on create.
    pub fn with_collaboration(mut self, enabled: bool) -> Self {
        self.collaboratable = enabled;
        self
    }

    /// Projects, optionally nested in a workspace.
    pub fn project() -> Self {
        Self::new(ResourceKind::Project)
            .nested_in(ResourceKind::Workspace)
            .with_queryable(&["title", "description"])
            .with_permitted(&["title", "description"])
    }

    /// Workspaces.
    pub fn workspace() -> Self {
        Self::new(ResourceKind::Workspace)
            .with_queryable(&["name"])
            .with_permitted(&["name"])
    }
}

/// A route resolved to its handler.
#[derive(Clone)]
pub struct ResolvedRoute {
    /// Handler of the addressed collection
    pub handler: Arc<dyn ResourceHandler>,

    /// Enclosing resource of a nested route
    pub parent: Option<ParentRoute>,
}

impl std::fmt::Debug for ResolvedRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedRoute")
            .field("kind", &self.handler.registration().kind)
            .field("parent", &self.parent)
            .finish()
    }
}

/// Route name to handler table.
#[derive(Default, Clone)]
pub struct ResourceRegistry {
    handlers: HashMap<&'static str, Arc<dyn ResourceHandler>>,
}

impl ResourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The projects and workspaces served by the tracker.
    pub fn standard<S>(store: Arc<S>) -> Self
    where
        S: ResourceStore<Project> + ResourceStore<Workspace> + CollaborationLedger + Catalog + 'static,
    {
        let mut registry = Self::new();
        registry.register(Arc::new(ResourceController::<Project, S>::new(
            Registration::project(),
            Arc::clone(&store),
        )));
        registry.register(Arc::new(ResourceController::<Workspace, S>::new(
            Registration::workspace(),
            store,
        )));
        registry
    }

    /// Register a handler under its kind's plural name.
    pub fn register(&mut self, handler: Arc<dyn ResourceHandler>) {
        let kind = handler.registration().kind;
        debug!(%kind, route = kind.plural(), "Registered resource");
        self.handlers.insert(kind.plural(), handler);
    }

    /// Handler for the route name `collection`.
    pub fn handler(&self, collection: &str) -> Option<Arc<dyn ResourceHandler>> {
        self.handlers.get(collection).cloned()
    }

    /// Registrations of every served kind, sorted by kind.
    pub fn registrations(&self) -> Vec<&Registration> {
        let mut registrations: Vec<_> = self.handlers.values().map(|h| h.registration()).collect();
        registrations.sort_by_key(|r| r.kind);
        registrations
    }

    /// Resolve `collection`, optionally nested under `parent` (route name and raw id).
    ///
    /// Unknown collections, unknown parents and parent/child pairs that are
    /// not registered all resolve to [`ApiError::NotFound`].
    pub fn resolve(&self, collection: &str, parent: Option<(&str, &str)>) -> ApiResult<ResolvedRoute> {
        let handler = self.handler(collection).ok_or(ApiError::NotFound)?;

        let parent = match parent {
            None => None,
            Some((name, raw_id)) => {
                let kind = self
                    .handler(name)
                    .map(|h| h.registration().kind)
                    .ok_or(ApiError::NotFound)?;
                if handler.registration().parent != Some(kind) {
                    debug!(%kind, collection, "Unregistered nesting");
                    return Err(ApiError::NotFound);
                }
                Some(ParentRoute::new(kind, raw_id))
            }
        };

        Ok(ResolvedRoute { handler, parent })
    }
}

impl std::fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("routes", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_store::MemoryStore;

    fn registry() -> ResourceRegistry {
        ResourceRegistry::standard(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_standard_registrations() {
        let registry = registry();
        let kinds: Vec<_> = registry.registrations().iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![ResourceKind::Project, ResourceKind::Workspace]);

        let projects = registry.handler("projects").unwrap();
        assert_eq!(projects.registration().parent, Some(ResourceKind::Workspace));
        assert_eq!(projects.registration().queryable, vec!["title", "description"]);
        assert!(projects.registration().collaboratable);

        let workspaces = registry.handler("workspaces").unwrap();
        assert_eq!(workspaces.registration().parent, None);
        assert_eq!(workspaces.registration().permitted, vec!["name"]);
    }

    #[test]
    fn test_resolve_flat_and_nested() {
        let registry = registry();

        let flat = registry.resolve("projects", None).unwrap();
        assert!(flat.parent.is_none());

        let nested = registry.resolve("projects", Some(("workspaces", "abc"))).unwrap();
        let parent = nested.parent.unwrap();
        assert_eq!(parent.kind, ResourceKind::Workspace);
        assert_eq!(parent.raw_id, "abc");
    }

    #[test]
    fn test_resolve_rejects_unknown_routes() {
        let registry = registry();

        assert!(matches!(registry.resolve("tasks", None), Err(ApiError::NotFound)));
        assert!(matches!(registry.resolve("project", None), Err(ApiError::NotFound)));
        assert!(matches!(
            registry.resolve("workspaces", Some(("projects", "abc"))),
            Err(ApiError::NotFound)
        ));
        assert!(matches!(
            registry.resolve("projects", Some(("teams", "abc"))),
            Err(ApiError::NotFound)
        ));
    }

    #[test]
    fn test_registration_builder() {
        let registration = Registration::new(ResourceKind::Workspace)
            .with_queryable(&["name"])
            .with_collaboration(false);

        assert!(!registration.collaboratable);
        assert!(registration.permitted.is_empty());
    }
}
