//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Email, NewUser, User, UserId, UserUpdate};
use crate::domain::DomainError;

/// Store gateway for user records.
///
/// Implementations own the email-uniqueness constraint: `insert` and `update`
/// must fail with `DomainError::EmailTaken` when the email already belongs to
/// another record, whatever the caller checked beforehand.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by normalized email
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError>;

    /// List all users, in no particular order
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Insert a new user; the store assigns the id
    async fn insert(&self, candidate: NewUser) -> Result<User, DomainError>;

    /// Apply a partial update to an existing user
    async fn update(&self, id: &UserId, update: UserUpdate) -> Result<(), DomainError>;

    /// Delete a user
    async fn delete(&self, id: &UserId) -> Result<(), DomainError>;

    /// Count users
    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.list().await?.len())
    }

    /// Check if an email is in use
    async fn email_exists(&self, email: &Email) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
