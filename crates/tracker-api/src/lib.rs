//! # Tracker API
//!
//! REST API over projects and workspaces where every read and write is gated
//! by the caller's collaborations.
//!
//! ## Overview
//!
//! The tracker-api crate handles:
//! - **Routing**: `/api/v1/{kind}s[/{id}]`, optionally nested under a parent
//! - **Registry**: the explicit table of served kinds and their fields
//! - **Controller**: list, show, create, update and destroy for any kind
//! - **Errors**: the JSON bodies and statuses clients rely on
//! - **Configuration**: environment-driven server settings
//!
//! ## Access rules
//!
//! - Listing returns only resources the caller actively collaborates on, or
//!   the children of a parent they collaborate on.
//! - An existing resource the caller may not touch yields 401; a missing one
//!   yields 404.
//! - Creating a resource also makes the caller its active owner.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tracker_api::ApiConfig;
//! use tracker_store::MemoryStore;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ApiConfig::from_env()?;
//! let store = Arc::new(MemoryStore::new());
//! let app = tracker_api::app(&config, store)?;
//!
//! let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod registry;
pub mod response;
pub mod seed;

use std::sync::Arc;

use tracker_auth::{AuthResult, JwtConfig, JwtService};
use tracker_model::{Project, Workspace};
use tracker_store::{ActorStore, Catalog, CollaborationLedger, ResourceStore};

pub use config::{ApiConfig, ConfigError, LogFormat};
pub use controller::{RequestContext, ResourceController, ResourceHandler};
pub use error::{ApiError, ApiResult};
pub use http::{router, AppState, CurrentActor};
pub use registry::{Registration, ResolvedRoute, ResourceRegistry};
pub use response::ApiResponse;
pub use seed::{seed_demo, Seeded};

/// Session token service for `config`.
pub fn jwt_service(config: &ApiConfig) -> AuthResult<JwtService> {
    JwtService::new(
        JwtConfig {
            secret: Some(config.signing_secret().to_string()),
            ..Default::default()
        }
        .with_issuer(config.jwt_issuer.clone())
        .with_token_duration(config.token_duration()),
    )
}

/// Router serving the standard resources from `store`.
pub fn app<S>(config: &ApiConfig, store: Arc<S>) -> AuthResult<axum::Router>
where
    S: ResourceStore<Project> + ResourceStore<Workspace> + CollaborationLedger + Catalog + ActorStore + 'static,
{
    let jwt = jwt_service(config)?;
    Ok(router(AppState::new(store, jwt, config.base_url.clone())))
}
