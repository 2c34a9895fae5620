//! Infrastructure layer - Storage, hashing, services and observability

pub mod logging;
pub mod observability;
pub mod user;
