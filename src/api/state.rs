//! Application state for shared services

use std::sync::Arc;

use crate::domain::{DomainError, PasswordChanged, UserId, UserRepository, UserView};
use crate::infrastructure::user::{
    CreateUserRequest, CredentialService, PasswordHasher, RotatePasswordRequest,
    UpdateProfileRequest, UserDirectoryService,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub directory_service: Arc<dyn DirectoryServiceTrait>,
    pub credential_service: Arc<dyn CredentialServiceTrait>,
}

impl AppState {
    /// Build both services over one store and one hasher
    pub fn new<R, H>(repository: Arc<R>, hasher: Arc<H>) -> Self
    where
        R: UserRepository + 'static,
        H: PasswordHasher + 'static,
    {
        Self {
            directory_service: Arc::new(UserDirectoryService::new(repository.clone())),
            credential_service: Arc::new(CredentialService::new(repository, hasher)),
        }
    }
}

/// Trait for directory operations
#[async_trait::async_trait]
pub trait DirectoryServiceTrait: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserView>, DomainError>;
    async fn get_user(&self, id: &str) -> Result<UserView, DomainError>;
    async fn delete_user(&self, id: &str) -> Result<UserId, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

/// Trait for credential operations
#[async_trait::async_trait]
pub trait CredentialServiceTrait: Send + Sync {
    async fn create_user(&self, request: CreateUserRequest) -> Result<UserView, DomainError>;
    async fn update_profile(
        &self,
        id: &str,
        request: UpdateProfileRequest,
    ) -> Result<UserId, DomainError>;
    async fn rotate_password(
        &self,
        id: &str,
        request: RotatePasswordRequest,
    ) -> Result<PasswordChanged, DomainError>;
}

// Implement traits for the actual services

#[async_trait::async_trait]
impl<R: UserRepository + 'static> DirectoryServiceTrait for UserDirectoryService<R> {
    async fn list_users(&self) -> Result<Vec<UserView>, DomainError> {
        UserDirectoryService::list_users(self).await
    }

    async fn get_user(&self, id: &str) -> Result<UserView, DomainError> {
        UserDirectoryService::get_user(self, id).await
    }

    async fn delete_user(&self, id: &str) -> Result<UserId, DomainError> {
        UserDirectoryService::delete_user(self, id).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserDirectoryService::count(self).await
    }
}

#[async_trait::async_trait]
impl<R, H> CredentialServiceTrait for CredentialService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn create_user(&self, request: CreateUserRequest) -> Result<UserView, DomainError> {
        CredentialService::create_user(self, request).await
    }

    async fn update_profile(
        &self,
        id: &str,
        request: UpdateProfileRequest,
    ) -> Result<UserId, DomainError> {
        CredentialService::update_profile(self, id, request).await
    }

    async fn rotate_password(
        &self,
        id: &str,
        request: RotatePasswordRequest,
    ) -> Result<PasswordChanged, DomainError> {
        CredentialService::rotate_password(self, id, request).await
    }
}
