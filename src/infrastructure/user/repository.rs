//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{Email, NewUser, User, UserId, UserRepository, UserUpdate};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<UserId, User>,
    /// Normalized email -> user ID
    email_index: HashMap<Email, UserId>,
}

/// In-memory implementation of UserRepository.
///
/// Records and the email index sit behind a single lock, so the uniqueness
/// check and the write it guards happen in one critical section.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError> {
        let inner = self.inner.read().await;

        Ok(inner
            .email_index
            .get(email)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().cloned().collect())
    }

    async fn insert(&self, candidate: NewUser) -> Result<User, DomainError> {
        let mut inner = self.inner.write().await;

        if inner.email_index.contains_key(candidate.email()) {
            return Err(DomainError::email_taken(candidate.email().as_str()));
        }

        let mut id = UserId::generate();
        while inner.users.contains_key(&id) {
            id = UserId::generate();
        }

        let user = User::from_new(id, candidate);
        inner.email_index.insert(user.email().clone(), id);
        inner.users.insert(id, user.clone());

        Ok(user)
    }

    async fn update(&self, id: &UserId, update: UserUpdate) -> Result<(), DomainError> {
        let mut inner = self.inner.write().await;
        let Inner { users, email_index } = &mut *inner;

        let user = users
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        // If email changed, check uniqueness and update index
        if let Some(new_email) = update.email() {
            if new_email != user.email() {
                if email_index.get(new_email).is_some_and(|owner| owner != id) {
                    return Err(DomainError::email_taken(new_email.as_str()));
                }

                email_index.remove(user.email());
                email_index.insert(new_email.clone(), *id);
            }
        }

        user.apply(&update);

        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), DomainError> {
        let mut inner = self.inner.write().await;

        match inner.users.remove(id) {
            Some(user) => {
                inner.email_index.remove(user.email());
                Ok(())
            }
            None => Err(DomainError::not_found(format!("User '{}' not found", id))),
        }
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.users.len())
    }
}
