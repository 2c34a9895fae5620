//! Domain layer - Core business logic and entities

pub mod error;
pub mod user;

pub use error::{DomainError, ErrorKind};
pub use user::{
    Email, NewUser, PasswordChanged, User, UserId, UserRepository, UserUpdate, UserView,
};
