//! Demo data for local development

use tracing::info;
use tracker_auth::JwtService;
use tracker_model::{Collaboration, Collaboratable, Project, User, Workspace};
use tracker_store::{ActorStore, ResourceStore};

use crate::error::ApiResult;

/// Email of the demo user.
pub const DEMO_EMAIL: &str = "yoda@dagobah.com";

/// What [`seed_demo`] created.
#[derive(Debug, Clone)]
pub struct Seeded {
    /// The demo user
    pub user: User,
    /// Workspace owned by the demo user
    pub workspace: Workspace,
    /// Project inside the workspace, owned by the demo user
    pub project: Project,
    /// Bearer token for the demo user
    pub token: String,
}

/// Create the demo user, a workspace and a project inside it.
///
/// Returns `None` without touching the store if the demo user already
/// exists.
pub async fn seed_demo<S>(store: &S, jwt: &JwtService) -> ApiResult<Option<Seeded>>
where
    S: ActorStore + ResourceStore<Workspace> + ResourceStore<Project>,
{
    if store.find_user_by_email(DEMO_EMAIL).await?.is_some() {
        info!(email = DEMO_EMAIL, "Demo data already present");
        return Ok(None);
    }

    let user = store
        .insert_user(User::new(DEMO_EMAIL, "Yoda", "the Great One"))
        .await?;

    let workspace = Workspace::new("The first workspace");
    let owner = Collaboration::ownership(user.actor(), workspace.reference());
    let (workspace, _) = ResourceStore::<Workspace>::insert_owned(store, workspace, owner).await?;

    let project = Project::new("The first project")
        .with_description("A very good project")
        .in_workspace(workspace.id);
    let owner = Collaboration::ownership(user.actor(), project.reference());
    let (project, _) = ResourceStore::<Project>::insert_owned(store, project, owner).await?;

    let token = jwt.issue_token(&user)?;
    info!(
        email = %user.email,
        workspace = %workspace.id,
        project = %project.id,
        token = %token,
        "Seeded demo data"
    );

    Ok(Some(Seeded {
        user,
        workspace,
        project,
        token,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_store::{CollaborationLedger, MemoryStore};

    #[tokio::test]
    async fn test_seed_once() {
        let store = MemoryStore::new();
        let jwt = JwtService::with_secret("seed-test-secret-that-is-long-enough").unwrap();

        let seeded = seed_demo(&store, &jwt).await.unwrap().unwrap();
        assert_eq!(seeded.user.display_name(), "Yoda the Great One");
        assert_eq!(seeded.project.workspace_id, Some(seeded.workspace.id));
        assert!(store
            .is_owner(&seeded.user.actor(), &seeded.workspace.reference())
            .await
            .unwrap());
        assert!(store
            .is_owner(&seeded.user.actor(), &seeded.project.reference())
            .await
            .unwrap());

        let claims = jwt.validate_token(&seeded.token).unwrap();
        assert_eq!(claims.user_id(), Some(seeded.user.id));

        assert!(seed_demo(&store, &jwt).await.unwrap().is_none());
        let workspaces = ResourceStore::<Workspace>::all(&store).await.unwrap();
        assert_eq!(workspaces.len(), 1);
    }
}
