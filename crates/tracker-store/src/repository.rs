//! Resource and actor stores

use async_trait::async_trait;
use tracker_model::{ActorRef, Collaboratable, Collaboration, ResourceRef, User};
use uuid::Uuid;

use crate::error::StoreResult;

/// Store of one collaboratable kind.
///
/// Listing methods return resources in creation order.
#[async_trait]
pub trait ResourceStore<T: Collaboratable>: Send + Sync {
    /// Every stored resource, regardless of who may see it.
    async fn all(&self) -> StoreResult<Vec<T>>;

    /// Resource `id`, regardless of who may see it.
    async fn fetch(&self, id: Uuid) -> StoreResult<Option<T>>;

    /// Resources on which `actor` holds an active collaboration.
    async fn visible_to(&self, actor: &ActorRef) -> StoreResult<Vec<T>>;

    /// Resources nested in `parent`.
    async fn children_of(&self, parent: &ResourceRef) -> StoreResult<Vec<T>>;

    /// Persist a new resource without any collaboration.
    async fn insert(&self, resource: T) -> StoreResult<T>;

    /// Persist a new resource together with its owner collaboration.
    ///
    /// Both records are validated before either is written; on error the
    /// store is unchanged.
    async fn insert_owned(&self, resource: T, owner: Collaboration) -> StoreResult<(T, Collaboration)>;

    /// Replace a stored resource.
    async fn update(&self, resource: T) -> StoreResult<T>;

    /// Delete resource `id` and every collaboration pointing at it.
    ///
    /// # Returns
    ///
    /// `true` if a resource was deleted
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}

/// Store of actors.
#[async_trait]
pub trait ActorStore: Send + Sync {
    /// Persist a new user.
    async fn insert_user(&self, user: User) -> StoreResult<User>;

    /// User `id`, if registered.
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// User registered under `email` (case-insensitive).
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Delete user `id` and every collaboration they hold.
    async fn delete_user(&self, id: Uuid) -> StoreResult<bool>;
}

/// Kind-erased existence checks.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Check if the referenced resource exists.
    async fn exists(&self, resource: &ResourceRef) -> StoreResult<bool>;
}
