//! Storage traits consumed by the authentication flow and the task routes.
//!
//! Two backends exist: [`PgStore`] for Postgres via `sqlx`, and
//! [`InMemoryStore`] for local runs and tests. Both enforce username
//! uniqueness on insert, so the check-then-insert in the registration flow
//! cannot admit duplicates under concurrency.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;

use crate::auth::password::verify_password;
use crate::error::AppError;
use crate::models::{Task, TaskInput, User};

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// True if a user with exactly this username exists.
    async fn exists(&self, username: &str) -> Result<bool, AppError>;

    /// Stores a new user and returns it with its assigned id.
    ///
    /// Fails with `AppError::Conflict` if the username is taken.
    async fn insert(&self, username: &str, password_hash: &str) -> Result<User, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Returns the user whose username matches exactly and whose stored digest
    /// accepts `password`.
    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        let Some(user) = self.find_by_username(username).await? else {
            return Ok(None);
        };
        if verify_password(password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks, ordered by id.
    async fn list(&self) -> Result<Vec<Task>, AppError>;

    async fn get(&self, id: i32) -> Result<Option<Task>, AppError>;

    async fn create(&self, input: TaskInput) -> Result<Task, AppError>;

    /// Replaces name and completion flag. `None` if the id is unknown.
    async fn update(&self, id: i32, input: TaskInput) -> Result<Option<Task>, AppError>;

    /// Removes the task. `false` if the id is unknown.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}
