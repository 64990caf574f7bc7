//! End-to-end tests for the tracker HTTP API.
//!
//! Requests are driven through the full axum router, including bearer
//! authentication, against an in-memory store.
//!
//! Covered flows:
//! 1. Authentication failures
//! 2. Create with owner collaboration
//! 3. 401 versus 404 on show, update and destroy
//! 4. Query filters on list
//! 5. Nested workspace routes

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use tracker_api::{app, jwt_service, ApiConfig};
use tracker_auth::JwtService;
use tracker_model::{ResourceKind, User};
use tracker_store::{ActorStore, CollaborationLedger, MemoryStore};

const BASE_URL: &str = "http://tracker.test";

/// Test fixture with two registered users.
struct TestFixture {
    app: Router,
    store: Arc<MemoryStore>,
    jwt: JwtService,
    alice: User,
    alice_token: String,
    bob_token: String,
}

/// A decoded response.
struct Reply {
    status: StatusCode,
    location: Option<String>,
    body: Value,
}

impl TestFixture {
    async fn new() -> Self {
        let config = ApiConfig {
            base_url: BASE_URL.to_string(),
            jwt_secret: Some("api-test-secret-that-is-long-enough".to_string()),
            ..ApiConfig::default()
        };
        let store = Arc::new(MemoryStore::new());
        let alice = store
            .insert_user(User::new("alice@example.com", "Alice", "Anders"))
            .await
            .unwrap();
        let bob = store
            .insert_user(User::new("bob@example.com", "Bob", "Berg"))
            .await
            .unwrap();

        let jwt = jwt_service(&config).unwrap();
        let alice_token = jwt.issue_token(&alice).unwrap();
        let bob_token = jwt.issue_token(&bob).unwrap();

        Self {
            app: app(&config, Arc::clone(&store)).unwrap(),
            store,
            jwt,
            alice,
            alice_token,
            bob_token,
        }
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Reply {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(body) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };

        let response = self.app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        Reply { status, location, body }
    }

    async fn get(&self, uri: &str, token: &str) -> Reply {
        self.send(Method::GET, uri, Some(token), None).await
    }

    async fn post(&self, uri: &str, token: &str, body: Value) -> Reply {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    async fn put(&self, uri: &str, token: &str, body: Value) -> Reply {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    async fn delete(&self, uri: &str, token: &str) -> Reply {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Create a project as Alice and return its id.
    async fn alice_project(&self, title: &str) -> String {
        let reply = self
            .post("/api/v1/projects", &self.alice_token, json!({ "project": { "title": title } }))
            .await;
        assert_eq!(reply.status, StatusCode::CREATED);
        reply.body["id"].as_str().unwrap().to_string()
    }

    /// Create a workspace as Alice and return its id.
    async fn alice_workspace(&self, name: &str) -> String {
        let reply = self
            .post("/api/v1/workspaces", &self.alice_token, json!({ "workspace": { "name": name } }))
            .await;
        assert_eq!(reply.status, StatusCode::CREATED);
        reply.body["id"].as_str().unwrap().to_string()
    }
}

fn not_permitted() -> Value {
    json!({
        "success": false,
        "error": "You don't have permission to view or modify that resource",
        "status": "401"
    })
}

fn not_found() -> Value {
    json!({ "success": false, "error": "Resource not found", "status": "404" })
}

/// Listed titles, sorted so assertions don't depend on store order.
fn titles(reply: &Reply) -> Vec<&str> {
    let mut titles: Vec<&str> = reply
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    titles.sort_unstable();
    titles
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_health_needs_no_session() {
    let fixture = TestFixture::new().await;

    let reply = fixture.send(Method::GET, "/health", None, None).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "ok");
}

#[tokio::test]
async fn test_missing_token_is_unauthenticated() {
    let fixture = TestFixture::new().await;

    let reply = fixture.send(Method::GET, "/api/v1/projects", None, None).await;

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        reply.body,
        json!({ "error": "You need to sign in or sign up before continuing." })
    );
}

#[tokio::test]
async fn test_bad_tokens_are_unauthenticated() {
    let fixture = TestFixture::new().await;

    let garbage = fixture.get("/api/v1/projects", "not-a-jwt").await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);

    let foreign = JwtService::with_secret("some-other-secret-that-is-long-enough").unwrap();
    let forged = foreign.issue_token(&fixture.alice).unwrap();
    let reply = fixture.get("/api/v1/projects", &forged).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_deleted_user_is_unauthenticated() {
    let fixture = TestFixture::new().await;
    let ghost = fixture
        .store
        .insert_user(User::new("ghost@example.com", "Casper", "Ghost"))
        .await
        .unwrap();
    let token = fixture.jwt.issue_token(&ghost).unwrap();
    fixture.store.delete_user(ghost.id).await.unwrap();

    let reply = fixture.get("/api/v1/projects", &token).await;

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_project_records_owner() {
    let fixture = TestFixture::new().await;

    let reply = fixture
        .post(
            "/api/v1/projects",
            &fixture.alice_token,
            json!({ "project": { "title": "A great project" } }),
        )
        .await;

    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["title"], "A great project");
    let id = reply.body["id"].as_str().unwrap();
    assert_eq!(
        reply.location.as_deref(),
        Some(format!("{}/api/v1/projects/{}", BASE_URL, id).as_str())
    );

    let records = fixture
        .store
        .records_for_kind(&fixture.alice.actor(), None, ResourceKind::Project)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].collaboratable.id.to_string(), id);
    assert!(records[0].is_owner());
    assert!(records[0].is_active());
}

#[tokio::test]
async fn test_create_without_title_uses_default() {
    let fixture = TestFixture::new().await;

    let reply = fixture
        .post("/api/v1/projects.json", &fixture.alice_token, json!({ "project": {} }))
        .await;

    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["title"], "Untitled Project");
}

#[tokio::test]
async fn test_create_without_wrapper_is_bad_request() {
    let fixture = TestFixture::new().await;

    let reply = fixture
        .post("/api/v1/projects", &fixture.alice_token, json!({ "title": "Loose" }))
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["success"], false);
    assert_eq!(reply.body["status"], "400");

    let reply = fixture
        .send(Method::POST, "/api/v1/projects", Some(fixture.alice_token.as_str()), None)
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_workspace_is_unprocessable_without_records() {
    let fixture = TestFixture::new().await;

    let reply = fixture
        .post("/api/v1/workspaces", &fixture.alice_token, json!({ "workspace": { "name": " " } }))
        .await;

    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.body, json!({ "name": ["can't be blank"] }));
    assert!(fixture
        .store
        .records_for(&fixture.alice.actor(), None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_non_text_attribute_is_invalid() {
    let fixture = TestFixture::new().await;

    let reply = fixture
        .post(
            "/api/v1/projects",
            &fixture.alice_token,
            json!({ "project": { "title": ["not", "text"] } }),
        )
        .await;

    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.body["title"], json!(["is invalid"]));
}

// ============================================================================
// 401 versus 404
// ============================================================================

#[tokio::test]
async fn test_show_own_project() {
    let fixture = TestFixture::new().await;
    let id = fixture.alice_project("Mine").await;

    let reply = fixture.get(&format!("/api/v1/projects/{}.json", id), &fixture.alice_token).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["title"], "Mine");
}

#[tokio::test]
async fn test_unrelated_user_is_not_permitted() {
    let fixture = TestFixture::new().await;
    let id = fixture.alice_project("Secret").await;
    let uri = format!("/api/v1/projects/{}", id);

    let show = fixture.get(&uri, &fixture.bob_token).await;
    assert_eq!(show.status, StatusCode::UNAUTHORIZED);
    assert_eq!(show.body, not_permitted());

    let update = fixture
        .put(&uri, &fixture.bob_token, json!({ "project": { "title": "Mine now" } }))
        .await;
    assert_eq!(update.status, StatusCode::UNAUTHORIZED);
    assert_eq!(update.body, not_permitted());

    let destroy = fixture.delete(&uri, &fixture.bob_token).await;
    assert_eq!(destroy.status, StatusCode::UNAUTHORIZED);

    let still_there = fixture.get(&uri, &fixture.alice_token).await;
    assert_eq!(still_there.body["title"], "Secret");
}

#[tokio::test]
async fn test_missing_project_is_not_found() {
    let fixture = TestFixture::new().await;
    let uri = format!("/api/v1/projects/{}", uuid::Uuid::now_v7());

    let show = fixture.get(&uri, &fixture.alice_token).await;
    assert_eq!(show.status, StatusCode::NOT_FOUND);
    assert_eq!(show.body, not_found());

    let update = fixture
        .put(&uri, &fixture.alice_token, json!({ "project": { "title": "x" } }))
        .await;
    assert_eq!(update.status, StatusCode::NOT_FOUND);

    let destroy = fixture.delete(&uri, &fixture.alice_token).await;
    assert_eq!(destroy.status, StatusCode::NOT_FOUND);

    let malformed = fixture.get("/api/v1/projects/42", &fixture.alice_token).await;
    assert_eq!(malformed.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_kind_is_not_found() {
    let fixture = TestFixture::new().await;

    let reply = fixture.get("/api/v1/tasks", &fixture.alice_token).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body, not_found());

    let reply = fixture.get("/nowhere", &fixture.alice_token).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Update and destroy
// ============================================================================

#[tokio::test]
async fn test_update_project() {
    let fixture = TestFixture::new().await;
    let id = fixture.alice_project("Draft").await;
    let uri = format!("/api/v1/projects/{}", id);

    let reply = fixture
        .send(
            Method::PATCH,
            &uri,
            Some(fixture.alice_token.as_str()),
            Some(json!({ "project": { "title": "Final", "description": "Done" } })),
        )
        .await;

    assert_eq!(reply.status, StatusCode::ACCEPTED);
    assert_eq!(reply.location.as_deref(), Some(format!("{}{}", BASE_URL, uri).as_str()));
    assert_eq!(reply.body["title"], "Final");

    let shown = fixture.get(&uri, &fixture.alice_token).await;
    assert_eq!(shown.body["description"], "Done");
}

#[tokio::test]
async fn test_update_with_blank_title_is_unprocessable() {
    let fixture = TestFixture::new().await;
    let id = fixture.alice_project("Keep me").await;
    let uri = format!("/api/v1/projects/{}", id);

    let reply = fixture
        .put(&uri, &fixture.alice_token, json!({ "project": { "title": "" } }))
        .await;

    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.body, json!({ "title": ["can't be blank"] }));

    let shown = fixture.get(&uri, &fixture.alice_token).await;
    assert_eq!(shown.body["title"], "Keep me");
}

#[tokio::test]
async fn test_destroy_is_acknowledged_then_not_found() {
    let fixture = TestFixture::new().await;
    let id = fixture.alice_project("Short lived").await;
    let uri = format!("/api/v1/projects/{}", id);

    let reply = fixture.delete(&uri, &fixture.alice_token).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.body,
        json!({ "success": true, "message": "Resource successfully deleted.", "status": "204" })
    );
    assert!(fixture
        .store
        .records_for(&fixture.alice.actor(), None)
        .await
        .unwrap()
        .is_empty());

    let again = fixture.delete(&uri, &fixture.alice_token).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

// ============================================================================
// List and query
// ============================================================================

#[tokio::test]
async fn test_list_only_shows_collaborations() {
    let fixture = TestFixture::new().await;
    fixture.alice_project("Alice's").await;
    fixture
        .post("/api/v1/projects", &fixture.bob_token, json!({ "project": { "title": "Bob's" } }))
        .await;

    let alice = fixture.get("/api/v1/projects", &fixture.alice_token).await;
    assert_eq!(alice.status, StatusCode::OK);
    assert_eq!(titles(&alice), vec!["Alice's"]);

    let bob = fixture.get("/api/v1/projects.json", &fixture.bob_token).await;
    assert_eq!(titles(&bob), vec!["Bob's"]);
}

#[tokio::test]
async fn test_list_query_modes() {
    let fixture = TestFixture::new().await;
    for title in ["Launch", "Relaunch", "launch", "Other"] {
        fixture.alice_project(title).await;
    }
    let token = &fixture.alice_token;

    let exact = fixture.get("/api/v1/projects?title=Launch", token).await;
    assert_eq!(titles(&exact), vec!["Launch"]);

    let fuzzy = fixture.get("/api/v1/projects?title=launch&fuzzy=true", token).await;
    assert_eq!(titles(&fuzzy), vec!["Launch", "Relaunch", "launch"]);

    let not_fuzzy = fixture.get("/api/v1/projects?title=launch&fuzzy=false", token).await;
    assert_eq!(titles(&not_fuzzy), vec!["launch"]);

    let any = fixture.get("/api/v1/projects?any=Other", token).await;
    assert_eq!(titles(&any), vec!["Other"]);

    let any_fuzzy = fixture.get("/api/v1/projects?any=LAUNCH&fuzzy=1", token).await;
    assert_eq!(titles(&any_fuzzy).len(), 3);

    let unknown_field = fixture.get("/api/v1/projects?owner=someone", token).await;
    assert_eq!(titles(&unknown_field).len(), 4);
}

// ============================================================================
// Nested routes
// ============================================================================

#[tokio::test]
async fn test_nested_create_and_list() {
    let fixture = TestFixture::new().await;
    let workspace = fixture.alice_workspace("Home").await;
    fixture.alice_project("Outside").await;
    let collection = format!("/api/v1/workspaces/{}/projects", workspace);

    let created = fixture
        .post(&collection, &fixture.alice_token, json!({ "project": { "title": "Inside" } }))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["workspace_id"], workspace.as_str());
    let id = created.body["id"].as_str().unwrap();
    assert_eq!(
        created.location.as_deref(),
        Some(format!("{}/api/v1/projects/{}", BASE_URL, id).as_str())
    );

    let listed = fixture.get(&collection, &fixture.alice_token).await;
    assert_eq!(titles(&listed), vec!["Inside"]);

    let shown = fixture
        .get(&format!("{}/{}", collection, id), &fixture.alice_token)
        .await;
    assert_eq!(shown.status, StatusCode::OK);
}

#[tokio::test]
async fn test_nested_routes_hide_foreign_workspaces() {
    let fixture = TestFixture::new().await;
    let workspace = fixture.alice_workspace("Private").await;
    let collection = format!("/api/v1/workspaces/{}/projects", workspace);

    let listed = fixture.get(&collection, &fixture.bob_token).await;
    assert_eq!(listed.status, StatusCode::UNAUTHORIZED);
    assert_eq!(listed.body, not_permitted());

    let created = fixture
        .post(&collection, &fixture.bob_token, json!({ "project": { "title": "Sneaky" } }))
        .await;
    assert_eq!(created.status, StatusCode::UNAUTHORIZED);

    let unwrapped = fixture.post(&collection, &fixture.bob_token, json!({})).await;
    assert_eq!(unwrapped.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unwrapped.body, not_permitted());

    let missing = format!("/api/v1/workspaces/{}/projects", uuid::Uuid::now_v7());
    let listed = fixture.get(&missing, &fixture.alice_token).await;
    assert_eq!(listed.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_nested_member_outside_parent_is_not_permitted() {
    let fixture = TestFixture::new().await;
    let workspace = fixture.alice_workspace("Home").await;
    let loose = fixture.alice_project("Loose").await;

    let reply = fixture
        .get(
            &format!("/api/v1/workspaces/{}/projects/{}", workspace, loose),
            &fixture.alice_token,
        )
        .await;

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unregistered_nesting_is_not_found() {
    let fixture = TestFixture::new().await;
    let project = fixture.alice_project("Parent?").await;

    let reply = fixture
        .get(&format!("/api/v1/projects/{}/workspaces", project), &fixture.alice_token)
        .await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body, not_found());
}
