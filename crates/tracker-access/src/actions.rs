//! # Verbs
//!
//! The five operations the API exposes on every registered kind.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operations that can be performed on a resource collection or member.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    /// List the visible members of a collection.
    List,

    /// Show one member.
    Show,

    /// Create a member.
    Create,

    /// Change one member.
    Update,

    /// Delete one member.
    Destroy,
}

impl Verb {
    /// Get the string representation of the verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::List => "list",
            Verb::Show => "show",
            Verb::Create => "create",
            Verb::Update => "update",
            Verb::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
