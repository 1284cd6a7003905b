//! Domain model for the authenticated user and their family name.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identity-provider user ID; doubles as the family ID of the user's children
    pub id: String,
    /// Unset until the family setup flow completes
    #[serde(default)]
    pub family_name: Option<String>,
}

impl User {
    /// A freshly signed-up user with no family configured.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            family_name: None,
        }
    }

    pub fn family_id(&self) -> &str {
        &self.id
    }
}
