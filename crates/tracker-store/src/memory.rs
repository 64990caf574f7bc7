//! In-memory store
//!
//! [`MemoryStore`] implements every store trait over one set of tables behind
//! a single `RwLock`, so multi-record writes (a resource plus its owner
//! collaboration, a delete plus its cascade) commit together or not at all.
//!
//! Resource rows are kept as JSON values per kind, keyed by their UUID v7 id,
//! which gives creation order on iteration.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use tracker_model::validation::BLANK;
use tracker_model::{
    ActorRef, Collaboratable, Collaboration, CollaborationState, ResourceKind, ResourceRef, User,
    ValidationErrors,
};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::ledger::CollaborationLedger;
use crate::repository::{ActorStore, Catalog, ResourceStore};

/// Message for a reference to a record that does not exist.
const MUST_EXIST: &str = "must exist";

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<Uuid, User>,
    rows: HashMap<ResourceKind, BTreeMap<Uuid, Value>>,
    collaborations: BTreeMap<Uuid, Collaboration>,
}

impl Tables {
    fn contains(&self, resource: &ResourceRef) -> bool {
        self.rows
            .get(&resource.kind)
            .is_some_and(|table| table.contains_key(&resource.id))
    }

    fn table(&self, kind: ResourceKind) -> impl Iterator<Item = (&Uuid, &Value)> {
        self.rows.get(&kind).into_iter().flat_map(|table| table.iter())
    }

    fn decode<T: Collaboratable>(value: &Value) -> StoreResult<T> {
        Ok(serde_json::from_value(value.clone())?)
    }

    fn decode_where<T, F>(&self, mut keep: F) -> StoreResult<Vec<T>>
    where
        T: Collaboratable,
        F: FnMut(&T) -> bool,
    {
        let mut resources = Vec::new();
        for (_, value) in self.table(T::KIND) {
            let resource = Self::decode::<T>(value)?;
            if keep(&resource) {
                resources.push(resource);
            }
        }
        Ok(resources)
    }

    fn active_ids(&self, actor: &ActorRef, kind: ResourceKind) -> HashSet<Uuid> {
        self.collaborations
            .values()
            .filter(|c| c.collaborator == *actor && c.collaboratable.kind == kind && c.is_active())
            .map(|c| c.collaboratable.id)
            .collect()
    }

    fn check_parent<T: Collaboratable>(&self, resource: &T) -> Result<(), ValidationErrors> {
        match resource.parent() {
            Some(parent) if !self.contains(&parent) => {
                Err(ValidationErrors::single(parent.kind.as_str(), MUST_EXIST))
            }
            _ => Ok(()),
        }
    }

    /// `pending` is a resource being inserted in the same write.
    fn check_collaboration(
        &self,
        record: &Collaboration,
        pending: Option<&ResourceRef>,
    ) -> Result<(), ValidationErrors> {
        let mut errors = record.validate().err().unwrap_or_default();
        if !self.users.contains_key(&record.collaborator.id) {
            errors.add("collaborator", BLANK);
        }
        if pending != Some(&record.collaboratable) && !self.contains(&record.collaboratable) {
            errors.add("collaboratable", BLANK);
        }
        errors.into_result()
    }

    fn put<T: Collaboratable>(&mut self, resource: &T) -> StoreResult<()> {
        let value = serde_json::to_value(resource)?;
        self.rows.entry(T::KIND).or_default().insert(resource.id(), value);
        Ok(())
    }

    fn cascade(&mut self, keep: impl Fn(&Collaboration) -> bool) -> usize {
        let before = self.collaborations.len();
        self.collaborations.retain(|_, c| keep(c));
        before - self.collaborations.len()
    }
}

/// In-memory implementation of every store trait.
///
/// Clones share the same tables.
///
/// # Examples
///
/// ```
/// use tracker_model::{Collaboration, Collaboratable, Project, User};
/// use tracker_store::{ActorStore, CollaborationLedger, MemoryStore, ResourceStore};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let store = MemoryStore::new();
/// let user = store.insert_user(User::new("a@b.c", "Ann", "Bee")).await.unwrap();
///
/// let project = Project::new("Launch");
/// let owner = Collaboration::ownership(user.actor(), project.reference());
/// store.insert_owned(project.clone(), owner).await.unwrap();
///
/// assert!(store.is_owner(&user.actor(), &project.reference()).await.unwrap());
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<T: Collaboratable> ResourceStore<T> for MemoryStore {
    async fn all(&self) -> StoreResult<Vec<T>> {
        let tables = self.tables.read().await;
        tables.decode_where(|_: &T| true)
    }

    async fn fetch(&self, id: Uuid) -> StoreResult<Option<T>> {
        let tables = self.tables.read().await;
        tables
            .rows
            .get(&T::KIND)
            .and_then(|table| table.get(&id))
            .map(Tables::decode::<T>)
            .transpose()
    }

    async fn visible_to(&self, actor: &ActorRef) -> StoreResult<Vec<T>> {
        let tables = self.tables.read().await;
        let visible = tables.active_ids(actor, T::KIND);
        tables.decode_where(|resource: &T| visible.contains(&resource.id()))
    }

    async fn children_of(&self, parent: &ResourceRef) -> StoreResult<Vec<T>> {
        let tables = self.tables.read().await;
        tables.decode_where(|resource: &T| resource.parent().as_ref() == Some(parent))
    }

    async fn insert(&self, resource: T) -> StoreResult<T> {
        let mut tables = self.tables.write().await;
        resource.validate()?;
        tables.check_parent(&resource)?;
        tables.put(&resource)?;
        debug!(kind = %T::KIND, id = %resource.id(), "Inserted resource");
        Ok(resource)
    }

    async fn insert_owned(&self, resource: T, owner: Collaboration) -> StoreResult<(T, Collaboration)> {
        let mut tables = self.tables.write().await;
        let reference = resource.reference();

        let mut errors = resource.validate().err().unwrap_or_default();
        if let Err(parent) = tables.check_parent(&resource) {
            errors.merge(parent);
        }
        if owner.collaboratable != reference {
            errors.add("collaboratable", "must reference the new resource");
        }
        if let Err(invalid) = tables.check_collaboration(&owner, Some(&reference)) {
            errors.merge(invalid);
        }
        errors.into_result()?;

        tables.put(&resource)?;
        tables.collaborations.insert(owner.id, owner.clone());
        debug!(
            kind = %T::KIND,
            id = %resource.id(),
            owner = %owner.collaborator,
            "Inserted resource with owner collaboration"
        );
        Ok((resource, owner))
    }

    async fn update(&self, resource: T) -> StoreResult<T> {
        let mut tables = self.tables.write().await;
        let reference = resource.reference();
        if !tables.contains(&reference) {
            return Err(StoreError::NotFound(reference));
        }
        resource.validate()?;
        tables.put(&resource)?;
        Ok(resource)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let removed = tables
            .rows
            .get_mut(&T::KIND)
            .and_then(|table| table.remove(&id))
            .is_some();
        if !removed {
            return Ok(false);
        }

        let reference = ResourceRef::new(T::KIND, id);
        let cascaded = tables.cascade(|c| c.collaboratable != reference);
        info!(kind = %T::KIND, %id, cascaded, "Deleted resource");
        Ok(true)
    }
}

#[async_trait]
impl CollaborationLedger for MemoryStore {
    async fn create(&self, record: Collaboration) -> StoreResult<Collaboration> {
        let mut tables = self.tables.write().await;
        tables.check_collaboration(&record, None)?;
        tables.collaborations.insert(record.id, record.clone());
        debug!(
            collaborator = %record.collaborator,
            collaboratable = %record.collaboratable,
            role = %record.role,
            state = %record.state,
            "Created collaboration"
        );
        Ok(record)
    }

    async fn find(
        &self,
        collaborator: &ActorRef,
        collaboratable: &ResourceRef,
    ) -> StoreResult<Option<Collaboration>> {
        let tables = self.tables.read().await;
        Ok(tables
            .collaborations
            .values()
            .find(|c| c.involves(collaborator, collaboratable))
            .cloned())
    }

    async fn records_for(
        &self,
        collaborator: &ActorRef,
        state: Option<CollaborationState>,
    ) -> StoreResult<Vec<Collaboration>> {
        let tables = self.tables.read().await;
        Ok(tables
            .collaborations
            .values()
            .filter(|c| c.collaborator == *collaborator)
            .filter(|c| state.map_or(true, |s| c.state == s))
            .cloned()
            .collect())
    }

    async fn records_for_kind(
        &self,
        collaborator: &ActorRef,
        state: Option<CollaborationState>,
        kind: ResourceKind,
    ) -> StoreResult<Vec<Collaboration>> {
        Ok(self
            .records_for(collaborator, state)
            .await?
            .into_iter()
            .filter(|c| c.collaboratable.kind == kind)
            .collect())
    }

    async fn records_on(&self, collaboratable: &ResourceRef) -> StoreResult<Vec<Collaboration>> {
        let tables = self.tables.read().await;
        Ok(tables
            .collaborations
            .values()
            .filter(|c| c.collaboratable == *collaboratable)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ActorStore for MemoryStore {
    async fn insert_user(&self, user: User) -> StoreResult<User> {
        user.validate()?;
        let mut tables = self.tables.write().await;
        tables.users.insert(user.id, user.clone());
        debug!(user = %user.id, "Inserted user");
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        let actor = ActorRef::user(id);
        let cascaded = tables.cascade(|c| c.collaborator != actor);
        info!(user = %id, cascaded, "Deleted user");
        Ok(true)
    }
}

#[async_trait]
impl Catalog for MemoryStore {
    async fn exists(&self, resource: &ResourceRef) -> StoreResult<bool> {
        Ok(self.tables.read().await.contains(resource))
    }
}
