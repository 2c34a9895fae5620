//! Read, list and delete operations over user accounts

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::user::{UserId, UserRepository, UserView};
use crate::domain::DomainError;

/// User directory: sanitized reads plus deletion
#[derive(Debug)]
pub struct UserDirectoryService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserDirectoryService<R> {
    /// Create a new directory service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// List all users as sanitized views
    pub async fn list_users(&self) -> Result<Vec<UserView>, DomainError> {
        let users = self.repository.list().await?;
        debug!(count = users.len(), "Listed users");

        Ok(users.iter().map(UserView::from).collect())
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: &str) -> Result<UserView, DomainError> {
        let user_id = parse_id(id)?;

        self.repository
            .find_by_id(&user_id)
            .await?
            .map(|user| user.view())
            .ok_or_else(|| unknown_user(id))
    }

    /// Delete a user; an absent user is reported before any store mutation
    pub async fn delete_user(&self, id: &str) -> Result<UserId, DomainError> {
        let user_id = parse_id(id)?;

        if self.repository.find_by_id(&user_id).await?.is_none() {
            return Err(unknown_user(id));
        }

        self.repository.delete(&user_id).await?;
        info!(user_id = %user_id, "User deleted");

        Ok(user_id)
    }

    /// Count users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}

/// Parse an external id; a malformed one cannot name any user
pub(crate) fn parse_id(id: &str) -> Result<UserId, DomainError> {
    UserId::parse(id).ok_or_else(|| unknown_user(id))
}

pub(crate) fn unknown_user(id: &str) -> DomainError {
    DomainError::not_found(format!("User '{}' not found", id))
}
