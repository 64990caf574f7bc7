//! Collaboration ledger
//!
//! The ledger owns every [`Collaboration`] record and answers the questions
//! the rest of the system asks about them: does this actor collaborate on this
//! resource, in which role, and which resources of a kind can the actor see.

use async_trait::async_trait;
use tracker_model::{ActorRef, Collaboration, CollaborationState, ResourceKind, ResourceRef, Role};

use crate::error::StoreResult;

/// Store of collaboration records.
///
/// Implementors provide the record queries; the capability checks are
/// provided on top of [`CollaborationLedger::find`] and
/// [`CollaborationLedger::records_for_kind`].
#[async_trait]
pub trait CollaborationLedger: Send + Sync {
    /// Persist a new record.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`](crate::StoreError::Validation) when the
    /// role is blank or either reference points at a missing record.
    async fn create(&self, record: Collaboration) -> StoreResult<Collaboration>;

    /// First record linking `collaborator` to `collaboratable`, if any.
    async fn find(
        &self,
        collaborator: &ActorRef,
        collaboratable: &ResourceRef,
    ) -> StoreResult<Option<Collaboration>>;

    /// All records held by `collaborator`, optionally restricted to `state`.
    async fn records_for(
        &self,
        collaborator: &ActorRef,
        state: Option<CollaborationState>,
    ) -> StoreResult<Vec<Collaboration>>;

    /// Records held by `collaborator` on resources of `kind`.
    async fn records_for_kind(
        &self,
        collaborator: &ActorRef,
        state: Option<CollaborationState>,
        kind: ResourceKind,
    ) -> StoreResult<Vec<Collaboration>>;

    /// All records pointing at `collaboratable`.
    async fn records_on(&self, collaboratable: &ResourceRef) -> StoreResult<Vec<Collaboration>>;

    /// Role of `actor` on `resource`, if they collaborate in any state.
    async fn role_for(&self, actor: &ActorRef, resource: &ResourceRef) -> StoreResult<Option<Role>> {
        Ok(self.find(actor, resource).await?.map(|record| record.role))
    }

    /// State of the collaboration between `actor` and `resource`.
    async fn state_for(
        &self,
        actor: &ActorRef,
        resource: &ResourceRef,
    ) -> StoreResult<Option<CollaborationState>> {
        Ok(self.find(actor, resource).await?.map(|record| record.state))
    }

    /// Check if `actor` holds `role` on `resource`, regardless of state.
    async fn has_role(&self, actor: &ActorRef, resource: &ResourceRef, role: &str) -> StoreResult<bool> {
        Ok(self
            .role_for(actor, resource)
            .await?
            .is_some_and(|held| held.as_str() == role))
    }

    /// Check if `actor` has an active collaboration on `resource`.
    ///
    /// Any active record counts, not only the first one for the pair.
    async fn is_collaborator(&self, actor: &ActorRef, resource: &ResourceRef) -> StoreResult<bool> {
        Ok(self
            .records_for_kind(actor, Some(CollaborationState::Active), resource.kind)
            .await?
            .iter()
            .any(|record| record.collaboratable == *resource))
    }

    /// Check if `actor` owns `resource`.
    async fn is_owner(&self, actor: &ActorRef, resource: &ResourceRef) -> StoreResult<bool> {
        self.has_role(actor, resource, Role::OWNER).await
    }

    /// Resources of `kind` that `actor` collaborates on, in record order.
    async fn collaboratables_of(
        &self,
        actor: &ActorRef,
        kind: ResourceKind,
        state: Option<CollaborationState>,
    ) -> StoreResult<Vec<ResourceRef>> {
        Ok(self
            .records_for_kind(actor, state, kind)
            .await?
            .into_iter()
            .map(|record| record.collaboratable)
            .collect())
    }
}
