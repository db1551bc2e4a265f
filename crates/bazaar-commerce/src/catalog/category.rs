//! Category types for product organization.
//!
//! The hierarchy is exactly two levels deep: top-level categories and
//! subcategories that point at one top-level parent.

use crate::current_timestamp;
use crate::error::CommerceError;
use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};

/// A catalog category or subcategory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Category name.
    pub name: String,
    /// Whether this is a second-level category.
    pub is_subcategory: bool,
    /// Parent category ID (present iff `is_subcategory`).
    pub parent: Option<CategoryId>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Category {
    /// Create a new top-level category.
    pub fn new_root(name: &str) -> Result<Self, CommerceError> {
        let name = validate_name(name)?;
        let now = current_timestamp();
        Ok(Self {
            id: CategoryId::generate(),
            name,
            is_subcategory: false,
            parent: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Create a new subcategory under `parent`.
    ///
    /// Fails if `parent` is itself a subcategory.
    pub fn new_child(parent: &Category, name: &str) -> Result<Self, CommerceError> {
        if parent.is_subcategory {
            return Err(CommerceError::validation(
                "parent_id",
                format!("{} is a subcategory and cannot have children", parent.id),
            ));
        }
        let name = validate_name(name)?;
        let now = current_timestamp();
        Ok(Self {
            id: CategoryId::generate(),
            name,
            is_subcategory: true,
            parent: Some(parent.id.clone()),
            created_at: now,
            updated_at: now,
        })
    }

    /// Check if this is a top-level category.
    pub fn is_root(&self) -> bool {
        !self.is_subcategory
    }

    /// Check if this category is the direct parent of `other`.
    pub fn is_parent_of(&self, other: &Category) -> bool {
        other.parent.as_ref() == Some(&self.id)
    }

    /// Change the display name.
    pub fn rename(&mut self, name: &str) -> Result<(), CommerceError> {
        self.name = validate_name(name)?;
        self.updated_at = current_timestamp();
        Ok(())
    }

    /// Check the flag/parent invariant.
    pub fn validate(&self) -> Result<(), CommerceError> {
        match (self.is_subcategory, &self.parent) {
            (true, None) => Err(CommerceError::validation(
                "parent_id",
                "a subcategory requires a parent",
            )),
            (false, Some(_)) => Err(CommerceError::validation(
                "parent_id",
                "a top-level category cannot have a parent",
            )),
            _ => Ok(()),
        }
    }
}

fn validate_name(name: &str) -> Result<String, CommerceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CommerceError::validation("name", "must not be empty"));
    }
    Ok(name.to_string())
}
