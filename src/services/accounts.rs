use std::sync::Arc;

use crate::auth::Claims;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::repositories::UserRepository;
use crate::domain::user::{Email, User};

/// Profile fields a user may change themselves
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    /// `Some("")` clears the phone number
    pub phone: Option<String>,
}

/// Local accounts backed by the external identity provider
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Finds or provisions the local account for verified identity claims
    ///
    /// Known subjects are returned directly. Otherwise the account is looked
    /// up by email and relinked to the new subject, and an unseen email gets
    /// a new customer account.
    pub async fn sign_in(&self, claims: &Claims) -> DomainResult<User> {
        if let Some(user) = self.users.find_by_external_id(&claims.sub).await? {
            return Ok(user);
        }

        let email = claims
            .email
            .as_deref()
            .ok_or_else(|| DomainError::Unauthorized("Identity token has no email".to_string()))?;
        let email = Email::new(email).map_err(DomainError::Validation)?;

        if let Some(mut user) = self.users.find_by_email(&email).await? {
            self.users.link_external_id(user.id, &claims.sub).await?;
            tracing::info!(user_id = %user.id, "Linked account to new identity subject");
            user.external_id = claims.sub.clone();
            return Ok(user);
        }

        let name = claims
            .name
            .clone()
            .unwrap_or_else(|| email.as_str().to_string());
        let user = User::provision(claims.sub.clone(), name, email.clone());

        match self.users.create(&user).await {
            Ok(()) => {
                tracing::info!(user_id = %user.id, "Provisioned new customer account");
                Ok(user)
            }
            // Lost a race with a concurrent first login
            Err(DomainError::Conflict(_)) => self
                .users
                .find_by_email(&email)
                .await?
                .ok_or_else(|| DomainError::not_found("User")),
            Err(e) => Err(e),
        }
    }

    /// Local account for a verified subject id
    ///
    /// # Errors
    /// * `DomainError::Unauthorized` - no local account has this subject
    pub async fn resolve(&self, external_id: &str) -> DomainResult<User> {
        self.users
            .find_by_external_id(external_id)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("Unknown user".to_string()))
    }

    pub async fn update_profile(&self, user: &User, patch: ProfilePatch) -> DomainResult<User> {
        let mut updated = user.clone();

        if let Some(name) = patch.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(DomainError::validation("Name cannot be empty"));
            }
            updated.name = name.to_string();
        }
        if let Some(phone) = patch.phone {
            updated.phone = normalize_phone(&phone)?;
        }

        self.users.update_profile(&updated).await?;
        Ok(updated)
    }
}

/// Accepts `+` followed by digits, or digits only; blank clears the number
fn normalize_phone(phone: &str) -> DomainResult<Option<String>> {
    let phone: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    if phone.is_empty() {
        return Ok(None);
    }

    let digits = phone.strip_prefix('+').unwrap_or(&phone);
    if digits.len() < 7 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::validation("Invalid phone number"));
    }
    Ok(Some(phone))
}
