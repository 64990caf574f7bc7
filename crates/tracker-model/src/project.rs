//! Project domain model
//!
//! Projects carry a title and a free-form description and may be nested in a
//! workspace. A project created without a title is named
//! [`Project::DEFAULT_TITLE`]; blanking the title later is a validation error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::collaboratable::Collaboratable;
use crate::kind::{ResourceKind, ResourceRef};
use crate::validation::{is_blank, Attributes, FieldValue, ValidationErrors, BLANK};

/// A project tracked by its collaborators.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use tracker_model::Project;
///
/// let workspace_id = Uuid::now_v7();
/// let project = Project::new("Launch")
///     .with_description("Ship it")
///     .in_workspace(workspace_id);
///
/// assert_eq!(project.title, "Launch");
/// assert_eq!(project.workspace_id, Some(workspace_id));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier for the project
    pub id: Uuid,

    /// Enclosing workspace, if any
    pub workspace_id: Option<Uuid>,

    /// Human-readable title
    pub title: String,

    /// Project description
    pub description: Option<String>,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Title given to projects created without one.
    pub const DEFAULT_TITLE: &'static str = "Untitled Project";

    /// Creates a new project outside any workspace.
    ///
    /// A blank `title` is replaced by [`Project::DEFAULT_TITLE`].
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            workspace_id: None,
            title: if is_blank(&title) {
                Self::DEFAULT_TITLE.to_string()
            } else {
                title
            },
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Nest the project in a workspace.
    pub fn in_workspace(mut self, workspace_id: Uuid) -> Self {
        self.workspace_id = Some(workspace_id);
        self
    }
}

impl Collaboratable for Project {
    const KIND: ResourceKind = ResourceKind::Project;

    fn id(&self) -> Uuid {
        self.id
    }

    fn parent(&self) -> Option<ResourceRef> {
        self.workspace_id
            .map(|id| ResourceRef::new(ResourceKind::Workspace, id))
    }

    fn build(attributes: &Attributes, parent: Option<ResourceRef>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let title = FieldValue::read(attributes, "title", &mut errors)
            .present()
            .unwrap_or_default();
        let description = FieldValue::read(attributes, "description", &mut errors);

        let mut project = Project::new(title);
        if let FieldValue::Text(description) = description {
            project.description = Some(description);
        }
        if let Some(parent) = parent.filter(|p| p.kind == ResourceKind::Workspace) {
            project.workspace_id = Some(parent.id);
        }

        errors.into_result()?;
        project.validate()?;
        Ok(project)
    }

    fn apply(&mut self, attributes: &Attributes) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match FieldValue::read(attributes, "title", &mut errors) {
            FieldValue::Absent => {}
            FieldValue::Null => self.title.clear(),
            FieldValue::Text(title) => self.title = title,
        }
        match FieldValue::read(attributes, "description", &mut errors) {
            FieldValue::Absent => {}
            FieldValue::Null => self.description = None,
            FieldValue::Text(description) => self.description = Some(description),
        }
        errors.into_result()?;
        self.validate()?;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn attribute(&self, field: &str) -> Option<&str> {
        match field {
            "title" => Some(&self.title),
            "description" => self.description.as_deref(),
            _ => None,
        }
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if is_blank(&self.title) {
            errors.add("title", BLANK);
        }
        errors.into_result()
    }
}
