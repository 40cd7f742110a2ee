use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};

/// Node in the product category tree
///
/// Categories form a parent-pointer tree; a `None` parent marks a root.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Partial update for a category; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub parent_id: Option<Uuid>,
}

impl Category {
    /// Creates a category with a normalized name
    ///
    /// Names are trimmed and lower-cased; an empty name is rejected.
    pub fn new(name: &str, parent_id: Option<Uuid>) -> DomainResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: normalize_name(name)?,
            parent_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Applies the supplied fields of `patch`
    ///
    /// Parent validity (existence, cycles) needs the rest of the tree and is
    /// checked by the catalog service before this is called.
    pub fn apply(&mut self, patch: CategoryPatch) -> DomainResult<()> {
        if let Some(name) = patch.name {
            self.name = normalize_name(&name)?;
        }
        if let Some(parent_id) = patch.parent_id {
            if parent_id == self.id {
                return Err(DomainError::validation(
                    "A category cannot be its own parent",
                ));
            }
            self.parent_id = Some(parent_id);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

pub(crate) fn normalize_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("Name cannot be empty"));
    }
    Ok(name.to_lowercase())
}
