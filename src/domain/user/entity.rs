//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque user identifier, assigned by the store on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form.
    ///
    /// Returns `None` for anything that is not a UUID, since such a string
    /// cannot name a stored user.
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(Self)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Email address normalized to lowercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Email {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored user record
#[derive(Clone, Serialize)]
pub struct User {
    id: UserId,
    name: String,
    email: Email,
    /// Argon2 PHC string - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh record from an insert candidate
    pub fn from_new(id: UserId, candidate: NewUser) -> Self {
        let now = Utc::now();

        Self {
            id,
            name: candidate.name,
            email: candidate.email,
            password_hash: candidate.password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate a record read back from storage
    pub fn from_parts(
        id: UserId,
        name: impl Into<String>,
        email: Email,
        password_hash: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email,
            password_hash: password_hash.into(),
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Apply a partial update; fields left as `None` are untouched
    pub fn apply(&mut self, update: &UserUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }

        if let Some(email) = &update.email {
            self.email = email.clone();
        }

        if let Some(hash) = &update.password_hash {
            self.password_hash = hash.clone();
        }

        self.touch();
    }

    /// Sanitized projection for callers outside the core
    pub fn view(&self) -> UserView {
        UserView::from(self)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Insert candidate: everything but the store-assigned id
#[derive(Clone)]
pub struct NewUser {
    name: String,
    email: Email,
    password_hash: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: Email, password_hash: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email,
            password_hash: password_hash.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Partial field set for `UserRepository::update`
#[derive(Clone, Default)]
pub struct UserUpdate {
    name: Option<String>,
    email: Option<Email>,
    password_hash: Option<String>,
}

impl UserUpdate {
    /// Profile change: name and email only
    pub fn profile(name: impl Into<String>, email: Email) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email),
            password_hash: None,
        }
    }

    /// Credential change: password hash only
    pub fn password(password_hash: impl Into<String>) -> Self {
        Self {
            name: None,
            email: None,
            password_hash: Some(password_hash.into()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn password_hash(&self) -> Option<&str> {
        self.password_hash.as_deref()
    }
}

impl std::fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserUpdate")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Sanitized user view: never carries the password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub email: Email,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Result of a successful password rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordChanged {
    pub id: UserId,
    pub message: String,
}

impl PasswordChanged {
    pub const MESSAGE: &'static str = "Password Success Change";

    pub fn new(id: UserId) -> Self {
        Self {
            id,
            message: Self::MESSAGE.to_string(),
        }
    }
}
