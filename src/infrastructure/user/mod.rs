//! User infrastructure module
//!
//! Password hashing with Argon2, the in-memory and PostgreSQL stores, and the
//! directory and credential services built on top of them.

mod credential_service;
mod directory_service;
mod password;
mod postgres_repository;
mod repository;

pub use credential_service::{
    CreateUserRequest, CredentialService, RotatePasswordRequest, UpdateProfileRequest,
};
pub use directory_service::UserDirectoryService;
pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
