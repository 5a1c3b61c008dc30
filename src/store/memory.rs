use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{CredentialStore, TaskStore};
use crate::error::AppError;
use crate::models::{Task, TaskInput, User};

struct Table<T> {
    next_id: i32,
    rows: BTreeMap<i32, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Process-local storage for users and tasks. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<Table<User>>,
    tasks: RwLock<Table<Task>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn exists(&self, username: &str) -> Result<bool, AppError> {
        let users = self.users.read().await;
        Ok(users.rows.values().any(|u| u.username == username))
    }

    async fn insert(&self, username: &str, password_hash: &str) -> Result<User, AppError> {
        // Uniqueness is checked under the same write lock as the insert.
        let mut users = self.users.write().await;
        if users.rows.values().any(|u| u.username == username) {
            return Err(AppError::Conflict("User already exists".into()));
        }

        let user = User {
            id: users.allocate_id(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        users.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.rows.values().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl TaskStore for InMemoryStore {
    async fn list(&self) -> Result<Vec<Task>, AppError> {
        Ok(self.tasks.read().await.rows.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Task>, AppError> {
        Ok(self.tasks.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, input: TaskInput) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().await;
        let task = Task::from_input(tasks.allocate_id(), input);
        tasks.rows.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update(&self, id: i32, input: TaskInput) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks.rows.get_mut(&id).map(|task| {
            task.name = input.name;
            task.is_complete = input.is_complete;
            task.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.tasks.write().await.rows.remove(&id).is_some())
    }
}
