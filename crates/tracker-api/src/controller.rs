//! Generic resource controller
//!
//! One [`ResourceController`] serves every verb for one collaboratable kind.
//! Handlers are stored kind-erased behind [`ResourceHandler`] so the
//! registry can dispatch on the route name alone.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};
use tracker_access::{ParentRoute, PermissionGate, Resolution, Verb};
use tracker_model::{ActorRef, Attributes, Collaboratable, Collaboration};
use tracker_store::{Catalog, CollaborationLedger, Predicate, QueryParams, ResourceStore};

use crate::error::{ApiError, ApiResult};
use crate::registry::Registration;
use crate::response::ApiResponse;

/// Who is asking, and through which route.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Authenticated actor
    pub actor: ActorRef,

    /// Enclosing resource of a nested route
    pub parent: Option<ParentRoute>,

    /// Public base URL for `Location` headers
    pub base_url: String,
}

impl RequestContext {
    /// Create a context for a flat route.
    pub fn new(actor: ActorRef, base_url: impl Into<String>) -> Self {
        Self {
            actor,
            parent: None,
            base_url: base_url.into(),
        }
    }

    /// Nest the request under `parent`.
    pub fn nested(mut self, parent: ParentRoute) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Kind-erased handler for one resource kind.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// How the kind is exposed.
    fn registration(&self) -> &Registration;

    /// Resources visible to the actor that match `params`.
    async fn list(&self, ctx: &RequestContext, params: &QueryParams) -> ApiResult<ApiResponse>;

    /// One resource.
    async fn show(&self, ctx: &RequestContext, raw_id: &str) -> ApiResult<ApiResponse>;

    /// Create a resource from a `{<kind>: {...}}` body.
    async fn create(&self, ctx: &RequestContext, body: Value) -> ApiResult<ApiResponse>;

    /// Update a resource from a `{<kind>: {...}}` body.
    async fn update(&self, ctx: &RequestContext, raw_id: &str, body: Value) -> ApiResult<ApiResponse>;

    /// Delete a resource and its collaborations.
    async fn destroy(&self, ctx: &RequestContext, raw_id: &str) -> ApiResult<ApiResponse>;
}

/// [`ResourceHandler`] for kind `T` backed by store `S`.
pub struct ResourceController<T, S: ?Sized> {
    registration: Registration,
    store: Arc<S>,
    gate: PermissionGate<S>,
    _kind: PhantomData<fn() -> T>,
}

impl<T, S> ResourceController<T, S>
where
    T: Collaboratable,
    S: ResourceStore<T> + CollaborationLedger + Catalog + ?Sized + 'static,
{
    /// Create a controller for `registration` over `store`.
    pub fn new(registration: Registration, store: Arc<S>) -> Self {
        Self {
            registration,
            gate: PermissionGate::new(Arc::clone(&store)),
            store,
            _kind: PhantomData,
        }
    }

    fn location(&self, ctx: &RequestContext, resource: &T) -> String {
        format!(
            "{}/api/v1/{}/{}",
            ctx.base_url,
            T::KIND.plural(),
            resource.id()
        )
    }

    /// Extract the `{<kind>: {...}}` wrapper, keeping permitted fields only.
    fn permitted(&self, body: Value) -> ApiResult<Attributes> {
        let key = T::KIND.as_str();
        let Value::Object(mut wrapper) = body else {
            return Err(missing_param(key));
        };
        let Some(Value::Object(attributes)) = wrapper.remove(key) else {
            return Err(missing_param(key));
        };

        let mut permitted = Attributes::new();
        for (field, value) in attributes {
            if self.registration.permitted.iter().any(|p| *p == field) {
                permitted.insert(field, value);
            } else {
                debug!(kind = %T::KIND, %field, "Unpermitted parameter");
            }
        }
        Ok(permitted)
    }

    async fn resolve(&self, ctx: &RequestContext, verb: Verb, raw_id: &str) -> ApiResult<T> {
        match self
            .gate
            .resolve::<T>(&ctx.actor, verb, raw_id, ctx.parent.as_ref())
            .await?
        {
            Resolution::Allowed(resource) => Ok(resource),
            Resolution::NotPermitted => Err(ApiError::NotPermitted),
            Resolution::NotFound => Err(ApiError::NotFound),
        }
    }

    fn serialize(resource: &T) -> ApiResult<Value> {
        serde_json::to_value(resource).map_err(|e| ApiError::Internal(e.to_string()))
    }
}

fn missing_param(key: &str) -> ApiError {
    ApiError::BadRequest(format!("param is missing or the value is empty: {}", key))
}

#[async_trait]
impl<T, S> ResourceHandler for ResourceController<T, S>
where
    T: Collaboratable,
    S: ResourceStore<T> + CollaborationLedger + Catalog + ?Sized + 'static,
{
    fn registration(&self) -> &Registration {
        &self.registration
    }

    async fn list(&self, ctx: &RequestContext, params: &QueryParams) -> ApiResult<ApiResponse> {
        let resources = match self.gate.scope::<T>(&ctx.actor, ctx.parent.as_ref()).await? {
            Resolution::Allowed(resources) => resources,
            Resolution::NotPermitted => return Err(ApiError::NotPermitted),
            Resolution::NotFound => return Err(ApiError::NotFound),
        };

        let predicate = Predicate::build(params, &self.registration.queryable);
        let items = predicate
            .filter(resources)
            .iter()
            .map(Self::serialize)
            .collect::<ApiResult<Vec<_>>>()?;

        debug!(actor = %ctx.actor, kind = %T::KIND, count = items.len(), "Listed");
        Ok(ApiResponse::Listed(items))
    }

    async fn show(&self, ctx: &RequestContext, raw_id: &str) -> ApiResult<ApiResponse> {
        let resource = self.resolve(ctx, Verb::Show, raw_id).await?;
        Ok(ApiResponse::Shown(Self::serialize(&resource)?))
    }

    async fn create(&self, ctx: &RequestContext, body: Value) -> ApiResult<ApiResponse> {
        let parent = match &ctx.parent {
            Some(route) => match self.gate.parent(&ctx.actor, route).await? {
                Some(parent) => Some(parent),
                None => return Err(ApiError::NotPermitted),
            },
            None => None,
        };
        let attributes = self.permitted(body)?;

        let resource = T::build(&attributes, parent)?;
        let resource = if self.registration.collaboratable {
            let owner = Collaboration::ownership(ctx.actor, resource.reference());
            let (resource, _) = self.store.insert_owned(resource, owner).await?;
            resource
        } else {
            self.store.insert(resource).await?
        };

        info!(actor = %ctx.actor, kind = %T::KIND, id = %resource.id(), "Created");
        Ok(ApiResponse::Created {
            location: self.location(ctx, &resource),
            body: Self::serialize(&resource)?,
        })
    }

    async fn update(&self, ctx: &RequestContext, raw_id: &str, body: Value) -> ApiResult<ApiResponse> {
        let current = self.resolve(ctx, Verb::Update, raw_id).await?;
        let attributes = self.permitted(body)?;

        let mut changed = current.clone();
        changed.apply(&attributes)?;
        let resource = self.store.update(changed).await?;

        info!(actor = %ctx.actor, kind = %T::KIND, id = %resource.id(), "Updated");
        Ok(ApiResponse::Accepted {
            location: self.location(ctx, &resource),
            body: Self::serialize(&resource)?,
        })
    }

    async fn destroy(&self, ctx: &RequestContext, raw_id: &str) -> ApiResult<ApiResponse> {
        let resource = self.resolve(ctx, Verb::Destroy, raw_id).await?;

        if self.store.delete(resource.id()).await? {
            info!(actor = %ctx.actor, kind = %T::KIND, id = %resource.id(), "Deleted");
            Ok(ApiResponse::Deleted)
        } else {
            Err(ApiError::NotPermitted)
        }
    }
}
