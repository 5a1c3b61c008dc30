use async_trait::async_trait;
use sqlx::PgPool;

use super::{CredentialStore, TaskStore};
use crate::error::AppError;
use crate::models::{Task, TaskInput, User};

const CREATE_USERS: &str = "CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    username VARCHAR(100) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL
)";

const CREATE_TASKS: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id SERIAL PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    is_complete BOOLEAN NOT NULL DEFAULT FALSE
)";

/// Postgres-backed storage for users and tasks.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url` and makes sure both tables exist.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPool::connect(database_url).await?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Creates the `users` and `tasks` tables if they are missing.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(CREATE_USERS).execute(&self.pool).await?;
        sqlx::query(CREATE_TASKS).execute(&self.pool).await?;
        log::info!("database schema is ready");
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn exists(&self, username: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert(&self, username: &str, password_hash: &str) -> Result<User, AppError> {
        // The UNIQUE constraint turns a lost race into AppError::Conflict.
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2)
             RETURNING id, username, password_hash",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list(&self) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>("SELECT id, name, is_complete FROM tasks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn get(&self, id: i32) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>("SELECT id, name, is_complete FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn create(&self, input: TaskInput) -> Result<Task, AppError> {
        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (name, is_complete) VALUES ($1, $2)
             RETURNING id, name, is_complete",
        )
        .bind(input.name)
        .bind(input.is_complete)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    async fn update(&self, id: i32, input: TaskInput) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET name = $1, is_complete = $2 WHERE id = $3
             RETURNING id, name, is_complete",
        )
        .bind(input.name)
        .bind(input.is_complete)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    async fn connect() -> PgStore {
        dotenv::dotenv().ok();
        let url = env::var("DATABASE_URL").expect("DATABASE_URL not set");
        PgStore::connect(&url).await.unwrap()
    }

    #[ignore]
    #[actix_rt::test]
    async fn test_duplicate_username_is_conflict() {
        let store = connect().await;
        let username = format!("pg_dup_{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0));

        store.insert(&username, "digest").await.unwrap();
        assert!(store.exists(&username).await.unwrap());
        assert!(matches!(
            store.insert(&username, "digest").await,
            Err(AppError::Conflict(_))
        ));

        sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(&username)
            .execute(&store.pool)
            .await
            .unwrap();
    }

    #[ignore]
    #[actix_rt::test]
    async fn test_task_round_trip() {
        let store = connect().await;

        let created = store
            .create(TaskInput {
                name: "pg task".to_string(),
                is_complete: false,
            })
            .await
            .unwrap();
        assert_eq!(store.get(created.id).await.unwrap(), Some(created.clone()));

        let updated = store
            .update(
                created.id,
                TaskInput {
                    name: "pg task done".to_string(),
                    is_complete: true,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(updated.is_complete);

        assert!(store.delete(created.id).await.unwrap());
        assert!(store.get(created.id).await.unwrap().is_none());
    }
}
