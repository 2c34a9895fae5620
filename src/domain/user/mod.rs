//! User domain
//!
//! Entities, sanitized views and the store gateway trait for user accounts.

mod entity;
mod repository;

pub use entity::{Email, NewUser, PasswordChanged, User, UserId, UserUpdate, UserView};
pub use repository::UserRepository;

#[cfg(test)]
pub use repository::mock::MockUserRepository;
