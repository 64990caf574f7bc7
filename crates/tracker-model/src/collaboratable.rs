//! The collaboratable capability
//!
//! Every resource kind reachable through the API implements
//! [`Collaboratable`]. Stores, the permission gate and the generic controller
//! are written against this trait only.

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::kind::{ResourceKind, ResourceRef};
use crate::validation::{Attributes, ValidationErrors};

/// A resource whose visibility is governed by collaboration records.
pub trait Collaboratable: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Kind tag of this resource.
    const KIND: ResourceKind;

    /// Identifier of the resource.
    fn id(&self) -> Uuid;

    /// Reference to the enclosing resource, if nested.
    fn parent(&self) -> Option<ResourceRef> {
        None
    }

    /// Build a new resource from permitted attributes.
    ///
    /// `parent` is the enclosing resource when the request was nested. The
    /// returned resource has already passed [`Collaboratable::validate`].
    fn build(attributes: &Attributes, parent: Option<ResourceRef>) -> Result<Self, ValidationErrors>;

    /// Apply permitted attributes to this resource and re-validate it.
    ///
    /// On error the resource may be partially modified; callers apply to a
    /// copy and discard it on failure.
    fn apply(&mut self, attributes: &Attributes) -> Result<(), ValidationErrors>;

    /// Text value of `field`, `None` for null values or unknown fields.
    fn attribute(&self, field: &str) -> Option<&str>;

    /// Check the resource's own validation rules.
    fn validate(&self) -> Result<(), ValidationErrors>;

    /// Tagged reference to this resource.
    fn reference(&self) -> ResourceRef {
        ResourceRef::new(Self::KIND, self.id())
    }
}
