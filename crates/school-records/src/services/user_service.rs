//! # User Service
//!
//! Lifecycle of login accounts. Emails are unique regardless of case. Passwords arrive in
//! clear text and are hashed before they reach the store; responses and events never carry
//! the hash.

use super::lifecycle::RecordLifecycle;
use crate::error::ServiceError;
use crate::model::{
    CreateUserRequest, UpdateUserRequest, User, UserCreate, UserId, UserResponse, UserUpdate,
};
use crate::passwords::PasswordHashing;
use crate::validation::{require, require_if_present};
use record_framework::{EventEmitter, ListQuery, Page, PageRequest, StoreClient};
use tracing::{debug, info, instrument};

#[derive(Clone)]
pub struct UserService {
    store: StoreClient<User>,
    events: EventEmitter,
    passwords: PasswordHashing,
}

impl RecordLifecycle<User> for UserService {
    fn store(&self) -> &StoreClient<User> {
        &self.store
    }

    fn events(&self) -> &EventEmitter {
        &self.events
    }
}

impl UserService {
    pub fn new(store: StoreClient<User>, events: EventEmitter, passwords: PasswordHashing) -> Self {
        Self {
            store,
            events,
            passwords,
        }
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create(&self, request: CreateUserRequest) -> Result<UserResponse, ServiceError> {
        require("name", &request.name)?;
        require("email", &request.email)?;
        require("password", &request.password)?;

        let email = request.email.trim().to_owned();
        self.ensure_available(&email, None).await?;

        let password_hash = self.passwords.hash(&request.password).await?;
        let user = self
            .insert_and_announce(UserCreate {
                name: request.name,
                email,
                role: request.role,
                password_hash,
            })
            .await?;
        info!(id = %user.id, role = %user.role, "User created");
        Ok(user.into())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: UserId) -> Result<UserResponse, ServiceError> {
        self.fetch(id).await.map(UserResponse::from)
    }

    #[instrument(skip(self))]
    pub async fn get_by_email(&self, email: &str) -> Result<UserResponse, ServiceError> {
        self.fetch_by_key(email).await.map(UserResponse::from)
    }

    /// `query.category` filters on the role (`ADMIN`, `TEACHER`, ...).
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        query: &ListQuery,
        page: PageRequest,
    ) -> Result<Page<UserResponse>, ServiceError> {
        Ok(self.find_page(query, page).await?.map(UserResponse::from))
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: UserId,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, ServiceError> {
        debug!(
            name = ?request.name,
            email = ?request.email,
            role = ?request.role,
            "update_user called"
        );
        require_if_present("name", request.name.as_deref())?;
        require_if_present("email", request.email.as_deref())?;

        let current = self.fetch(id).await?;
        let email = request.email.map(|e| e.trim().to_owned());
        if let Some(email) = &email {
            self.ensure_available(email, Some(&current)).await?;
        }

        let password_hash = match request.password.filter(|p| !p.trim().is_empty()) {
            Some(password) => Some(self.passwords.hash(&password).await?),
            None => None,
        };

        let user = self
            .update_and_announce(
                id,
                UserUpdate {
                    name: request.name,
                    email,
                    role: request.role,
                    password_hash,
                },
            )
            .await?;
        info!(%id, "User updated");
        Ok(user.into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: UserId) -> Result<(), ServiceError> {
        self.remove(id).await?;
        info!(%id, "User deleted");
        Ok(())
    }

    /// Checks a clear-text password against the stored hash. Unknown emails yield `NotFound`.
    #[instrument(skip(self, password))]
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<bool, ServiceError> {
        let user = self.fetch_by_key(email).await?;
        Ok(self.passwords.verify(password, &user.password_hash))
    }
}
