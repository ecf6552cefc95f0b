//! Profile reads and partial updates for the authenticated user.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::{ProfileChanges, PublicUser};

/// Profile operations over the user repository.
#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserRepository>,
}

impl ProfileService {
    /// Create a profile service backed by the given repository.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Fetch the caller's sanitized profile.
    pub async fn get(&self, user_id: Uuid) -> Result<PublicUser, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(|user| user.to_public())
            .ok_or_else(|| DomainError::not_found("User not found"))
    }

    /// Apply a partial profile update and return the refreshed record.
    pub async fn update(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> Result<PublicUser, DomainError> {
        if changes.is_empty() {
            return Err(DomainError::invalid_request("No profile fields provided"));
        }
        if let Some(name) = &changes.name {
            if name.trim().is_empty() {
                return Err(DomainError::invalid_request("Name must not be empty"));
            }
        }

        self.users
            .update_profile(user_id, &changes)
            .await?
            .map(|user| user.to_public())
            .ok_or_else(|| DomainError::not_found("User not found"))
    }
}
