//! Credential flows: account creation, profile update and password rotation
//!
//! Each flow is a fixed sequence of guards followed by at most one store
//! write. A failed guard returns before anything is written.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::user::{
    Email, NewUser, PasswordChanged, UserId, UserRepository, UserUpdate, UserView,
};
use crate::domain::{DomainError, ErrorKind};
use crate::infrastructure::observability::record_credential_operation;

use super::directory_service::{parse_id, unknown_user};
use super::password::PasswordHasher;

/// Request for creating a new user
#[derive(Clone)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Request for changing a user's name and email
#[derive(Debug, Clone)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
}

/// Request for rotating a user's password
#[derive(Clone)]
pub struct RotatePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

/// Credential service enforcing the account invariants
#[derive(Debug)]
pub struct CredentialService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> CredentialService<R, H> {
    /// Create a new credential service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Create a user.
    ///
    /// Guards run in order: email uniqueness, then password confirmation.
    /// The store's own uniqueness constraint still decides races between
    /// concurrent creations.
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<UserView, DomainError> {
        let email = Email::new(&request.email);
        let result = self.try_create_user(request, email.clone()).await;

        observe("create_user", email.as_str(), &result);
        result
    }

    async fn try_create_user(
        &self,
        request: CreateUserRequest,
        email: Email,
    ) -> Result<UserView, DomainError> {
        if self.repository.email_exists(&email).await? {
            return Err(DomainError::email_taken(email.as_str()));
        }

        if request.password_confirm != request.password {
            return Err(DomainError::PasswordMismatch);
        }

        let password_hash = self.hasher.hash(&request.password)?;

        let user = self
            .repository
            .insert(NewUser::new(request.name, email, password_hash))
            .await
            .map_err(into_store_error)?;

        Ok(user.view())
    }

    /// Change name and email; the password hash is never touched
    pub async fn update_profile(
        &self,
        id: &str,
        request: UpdateProfileRequest,
    ) -> Result<UserId, DomainError> {
        let result = self.try_update_profile(id, request).await;

        observe("update_profile", id, &result);
        result
    }

    async fn try_update_profile(
        &self,
        id: &str,
        request: UpdateProfileRequest,
    ) -> Result<UserId, DomainError> {
        let email = Email::new(&request.email);
        let user_id = parse_id(id)?;

        if self.repository.find_by_id(&user_id).await?.is_none() {
            return Err(unknown_user(id));
        }

        if let Some(owner) = self.repository.find_by_email(&email).await? {
            if owner.id() != &user_id {
                return Err(DomainError::email_taken(email.as_str()));
            }
        }

        self.repository
            .update(&user_id, UserUpdate::profile(request.name, email))
            .await?;

        Ok(user_id)
    }

    /// Replace the password after checking the old one.
    ///
    /// The old password is verified before the new pair is compared.
    pub async fn rotate_password(
        &self,
        id: &str,
        request: RotatePasswordRequest,
    ) -> Result<PasswordChanged, DomainError> {
        let result = self.try_rotate_password(id, request).await;

        observe("rotate_password", id, &result);
        result
    }

    async fn try_rotate_password(
        &self,
        id: &str,
        request: RotatePasswordRequest,
    ) -> Result<PasswordChanged, DomainError> {
        let user_id = parse_id(id)?;

        let user = self
            .repository
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| unknown_user(id))?;

        if !self.hasher.verify(&request.old_password, user.password_hash()) {
            return Err(DomainError::InvalidOldPassword);
        }

        if request.new_password_confirm != request.new_password {
            return Err(DomainError::PasswordMismatch);
        }

        let password_hash = self.hasher.hash(&request.new_password)?;

        self.repository
            .update(&user_id, UserUpdate::password(password_hash))
            .await?;

        Ok(PasswordChanged::new(user_id))
    }
}

/// Anything the store reports besides a lost email race is a persistence failure
fn into_store_error(err: DomainError) -> DomainError {
    match err.kind() {
        ErrorKind::EmailTaken | ErrorKind::Persistence => err,
        _ => DomainError::persistence(err.to_string()),
    }
}

fn observe<T>(operation: &'static str, subject: &str, result: &Result<T, DomainError>) {
    match result {
        Ok(_) => {
            info!(operation, subject, "Credential operation succeeded");
            record_credential_operation(operation, "success");
        }
        Err(err) => {
            let reason = err.kind().as_str();

            match err.kind() {
                ErrorKind::Persistence | ErrorKind::Hashing | ErrorKind::Configuration => {
                    error!(operation, subject, reason, error = %err, "Credential operation failed")
                }
                _ => warn!(operation, subject, reason, "Credential operation rejected"),
            }

            record_credential_operation(operation, reason);
        }
    }
}
