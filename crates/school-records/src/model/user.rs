use super::Role;
use chrono::{DateTime, Utc};
use record_framework::RecordEntity;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

super::record_id!(
    /// Store-assigned user id.
    UserId
);

/// A login account. The email is unique, compared case-insensitively.
///
/// `password_hash` holds an Argon2 PHC string and never leaves the service layer: callers
/// get a [`UserResponse`] and events carry a [`UserSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    /// A blank password leaves the current one in place.
    pub password: Option<String>,
}

/// Store payload for a new user; the password is already hashed.
#[derive(Clone)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
}

#[derive(Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub password_hash: Option<String>,
}

// Hand-written so store debug logs never print a hash.
impl std::fmt::Debug for UserCreate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCreate")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserUpdate")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("password_changed", &self.password_hash.is_some())
            .finish()
    }
}

/// What callers see of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Event payload fields for a user.
#[derive(Debug, Clone, Serialize)]
pub struct UserSnapshot {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl RecordEntity for User {
    const KIND: &'static str = "user";
    type Id = UserId;
    type Create = UserCreate;
    type Update = UserUpdate;
    type Snapshot = UserSnapshot;

    fn from_create_params(id: UserId, params: UserCreate, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: params.name,
            email: params.email,
            role: params.role,
            password_hash: params.password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    fn id(&self) -> UserId {
        self.id
    }

    fn identifying_field(&self) -> &str {
        &self.email
    }

    fn normalize_key(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    fn apply_update(&mut self, update: UserUpdate, now: DateTime<Utc>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(hash) = update.password_hash {
            self.password_hash = hash;
        }
        self.updated_at = now;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> Option<&str> {
        Some(self.role.as_str())
    }

    fn sortable_fields() -> &'static [&'static str] {
        &["id", "name", "email", "role", "created_at", "updated_at"]
    }

    fn compare_by(&self, other: &Self, field: &str) -> Option<Ordering> {
        match field {
            "id" => Some(self.id.cmp(&other.id)),
            "name" => Some(self.name.cmp(&other.name)),
            "email" => Some(self.email.to_lowercase().cmp(&other.email.to_lowercase())),
            "role" => Some(self.role.cmp(&other.role)),
            "created_at" => Some(self.created_at.cmp(&other.created_at)),
            "updated_at" => Some(self.updated_at.cmp(&other.updated_at)),
            _ => None,
        }
    }

    fn snapshot(&self) -> UserSnapshot {
        UserSnapshot {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}
