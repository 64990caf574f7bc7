//! HTTP surface
//!
//! Routes, extractors and shared state for the axum server.

use std::collections::HashMap;
use std::sync::Arc;

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracker_auth::jwt::bearer_token;
use tracker_auth::{AuthError, JwtService};
use tracker_model::{Project, User, Workspace};
use tracker_store::{ActorStore, Catalog, CollaborationLedger, QueryParams, ResourceStore};

use crate::controller::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::registry::{ResolvedRoute, ResourceRegistry};
use crate::response::ApiResponse;

/// Optional format suffix accepted on the last path segment.
const FORMAT_SUFFIX: &str = ".json";

/// State shared by every request.
#[derive(Clone)]
pub struct AppState {
    registry: Arc<ResourceRegistry>,
    actors: Arc<dyn ActorStore>,
    jwt: Arc<JwtService>,
    base_url: Arc<str>,
}

impl AppState {
    /// Serve the standard resources from `store`.
    pub fn new<S>(store: Arc<S>, jwt: JwtService, base_url: impl Into<String>) -> Self
    where
        S: ResourceStore<Project>
            + ResourceStore<Workspace>
            + CollaborationLedger
            + Catalog
            + ActorStore
            + 'static,
    {
        let actors: Arc<dyn ActorStore> = store.clone();
        Self::with_registry(ResourceRegistry::standard(store), actors, jwt, base_url)
    }

    /// Serve the handlers of `registry`, authenticating against `actors`.
    pub fn with_registry(
        registry: ResourceRegistry,
        actors: Arc<dyn ActorStore>,
        jwt: JwtService,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            registry: Arc::new(registry),
            actors,
            jwt: Arc::new(jwt),
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    /// The resource registry.
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Resolve an `Authorization` header value to a registered user.
    pub async fn authenticate(&self, header: &str) -> ApiResult<User> {
        let token = bearer_token(header)?;
        let claims = self.jwt.validate_token(token)?;
        let id = claims
            .user_id()
            .ok_or_else(|| AuthError::InvalidToken("Subject is not a user id".to_string()))?;

        match self.actors.find_user(id).await? {
            Some(user) => Ok(user),
            None => Err(AuthError::UnknownActor.into()),
        }
    }

    fn context(&self, user: &User, route: &Route) -> RequestContext {
        let ctx = RequestContext::new(user.actor(), self.base_url.as_ref());
        match &route.resolved.parent {
            Some(parent) => ctx.nested(parent.clone()),
            None => ctx,
        }
    }
}

/// The authenticated user of a request.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingCredentials)?;

        state.authenticate(header).await.map(CurrentActor)
    }
}

/// The collection (and member id) a request addresses.
#[derive(Debug, Clone)]
pub struct Route {
    resolved: ResolvedRoute,
    id: Option<String>,
}

impl Route {
    fn id(&self) -> ApiResult<&str> {
        self.id.as_deref().ok_or(ApiError::NotFound)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Route {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound)?;

        let id = params.get("id").map(|id| strip_format(id).to_string());
        let collection = params.get("collection").ok_or(ApiError::NotFound)?;
        let collection = match id {
            Some(_) => collection.as_str(),
            None => strip_format(collection),
        };
        let parent = match (params.get("parent"), params.get("parent_id")) {
            (Some(name), Some(raw_id)) => Some((name.as_str(), raw_id.as_str())),
            _ => None,
        };

        let resolved = state.registry.resolve(collection, parent)?;
        Ok(Route { resolved, id })
    }
}

fn strip_format(segment: &str) -> &str {
    segment.strip_suffix(FORMAT_SUFFIX).unwrap_or(segment)
}

fn parse_body(bytes: &[u8]) -> ApiResult<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/:collection", get(list).post(create))
        .route(
            "/api/v1/:collection/:id",
            get(show).put(update).patch(update).delete(destroy),
        )
        .route("/api/v1/:parent/:parent_id/:collection", get(list).post(create))
        .route(
            "/api/v1/:parent/:parent_id/:collection/:id",
            get(show).put(update).patch(update).delete(destroy),
        )
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn list(
    State(state): State<AppState>,
    route: Route,
    CurrentActor(user): CurrentActor,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<ApiResponse> {
    let ctx = state.context(&user, &route);
    route
        .resolved
        .handler
        .list(&ctx, &QueryParams::from_pairs(params))
        .await
}

async fn show(
    State(state): State<AppState>,
    route: Route,
    CurrentActor(user): CurrentActor,
) -> ApiResult<ApiResponse> {
    let ctx = state.context(&user, &route);
    route.resolved.handler.show(&ctx, route.id()?).await
}

async fn create(
    State(state): State<AppState>,
    route: Route,
    CurrentActor(user): CurrentActor,
    body: Bytes,
) -> ApiResult<ApiResponse> {
    let ctx = state.context(&user, &route);
    route.resolved.handler.create(&ctx, parse_body(&body)?).await
}

async fn update(
    State(state): State<AppState>,
    route: Route,
    CurrentActor(user): CurrentActor,
    body: Bytes,
) -> ApiResult<ApiResponse> {
    let ctx = state.context(&user, &route);
    route
        .resolved
        .handler
        .update(&ctx, route.id()?, parse_body(&body)?)
        .await
}

async fn destroy(
    State(state): State<AppState>,
    route: Route,
    CurrentActor(user): CurrentActor,
) -> ApiResult<ApiResponse> {
    let ctx = state.context(&user, &route);
    route.resolved.handler.destroy(&ctx, route.id()?).await
}
