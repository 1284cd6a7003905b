//! Domain model for a child.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::ValidationError;

pub const MAX_CHILD_NAME_LENGTH: usize = 100;

/// Child ID in format: "child::<uuid>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: String,
    /// The family (owning user) this child belongs to
    pub family_id: String,
    pub name: String,
    pub age: u32,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

impl Child {
    /// Build a new child, validating name and age.
    pub fn new(
        family_id: &str,
        name: &str,
        age: i64,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: Self::generate_id(),
            family_id: family_id.to_string(),
            name: Self::validate_name(name)?,
            age: Self::validate_age(age)?,
            created_date: now,
            updated_date: now,
        })
    }

    pub fn generate_id() -> String {
        format!("child::{}", Uuid::new_v4())
    }

    /// Returns the trimmed name.
    pub fn validate_name(name: &str) -> Result<String, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyChildName);
        }
        if name.chars().count() > MAX_CHILD_NAME_LENGTH {
            return Err(ValidationError::ChildNameTooLong(MAX_CHILD_NAME_LENGTH));
        }
        Ok(name.to_string())
    }

    pub fn validate_age(age: i64) -> Result<u32, ValidationError> {
        if age <= 0 {
            return Err(ValidationError::NonPositiveAge(age));
        }
        u32::try_from(age).map_err(|_| ValidationError::AgeOutOfRange(age))
    }
}
