use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::value_objects::{Email, UserRole};

/// Local account mirrored from the external identity provider
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    /// Subject id issued by the identity provider
    pub external_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Provisions a customer account for a first-time sign in
    pub fn provision(external_id: impl Into<String>, name: impl Into<String>, email: Email) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            external_id: external_id.into(),
            name: name.into(),
            email: email.as_str().to_string(),
            phone: None,
            role: UserRole::Customer,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}
