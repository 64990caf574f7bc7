//! Workspace domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::collaboratable::Collaboratable;
use crate::kind::{ResourceKind, ResourceRef};
use crate::validation::{is_blank, Attributes, FieldValue, ValidationErrors, BLANK};

/// A named workspace grouping projects.
///
/// # Examples
///
/// ```
/// use tracker_model::{Collaboratable, Workspace};
///
/// let workspace = Workspace::new("Platform");
/// assert_eq!(workspace.name, "Platform");
/// assert!(workspace.validate().is_ok());
/// assert!(Workspace::new("").validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    /// Unique identifier for the workspace
    pub id: Uuid,

    /// Workspace name (required)
    pub name: String,

    /// When the workspace was created
    pub created_at: DateTime<Utc>,

    /// When the workspace was last updated
    pub updated_at: DateTime<Utc>,
}

impl Workspace {
    /// Creates a new workspace. The name is not validated here.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Collaboratable for Workspace {
    const KIND: ResourceKind = ResourceKind::Workspace;

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(attributes: &Attributes, _parent: Option<ResourceRef>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = FieldValue::read(attributes, "name", &mut errors)
            .present()
            .unwrap_or_default();
        let workspace = Workspace::new(name);

        if let Err(invalid) = workspace.validate() {
            errors.merge(invalid);
        }
        errors.into_result()?;
        Ok(workspace)
    }

    fn apply(&mut self, attributes: &Attributes) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match FieldValue::read(attributes, "name", &mut errors) {
            FieldValue::Absent => {}
            FieldValue::Null => self.name.clear(),
            FieldValue::Text(name) => self.name = name,
        }
        errors.into_result()?;
        self.validate()?;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn attribute(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            _ => None,
        }
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if is_blank(&self.name) {
            errors.add("name", BLANK);
        }
        errors.into_result()
    }
}
