use std::sync::Arc;

use crate::auth::{AuthService, TokenIssuer};
use crate::store::{CredentialStore, TaskStore};

/// Everything a request handler needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub tokens: Arc<TokenIssuer>,
    pub tasks: Arc<dyn TaskStore>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        tasks: Arc<dyn TaskStore>,
        tokens: Arc<TokenIssuer>,
        hash_cost: u32,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(users, tokens.clone(), hash_cost)),
            tokens,
            tasks,
        }
    }
}
