use std::sync::Arc;

use log::{info, warn};
use validator::Validate;

use crate::auth::password::hash_password;
use crate::auth::token::TokenIssuer;
use crate::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::error::AppError;
use crate::store::CredentialStore;

/// Turns username/password requests into bearer tokens.
pub struct AuthService {
    users: Arc<dyn CredentialStore>,
    tokens: Arc<TokenIssuer>,
    hash_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn CredentialStore>, tokens: Arc<TokenIssuer>, hash_cost: u32) -> Self {
        Self {
            users,
            tokens,
            hash_cost,
        }
    }

    /// Creates an account and returns a token for it.
    ///
    /// Fails with `ValidationError` on empty or oversized fields and with
    /// `Conflict` if the username is taken, whatever the password.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        if self.users.exists(&request.username).await? {
            warn!("registration rejected: username {:?} taken", request.username);
            return Err(AppError::Conflict("User already exists".into()));
        }

        let password_hash = hash_password(&request.password, self.hash_cost)?;
        let user = self.users.insert(&request.username, &password_hash).await?;
        let token = self.tokens.issue(user.id, &user.username)?;

        info!("registered user {} ({})", user.id, user.username);
        Ok(AuthResponse {
            token,
            message: "Registration successful".into(),
        })
    }

    /// Checks the credentials and returns a fresh token.
    ///
    /// Unknown usernames and wrong passwords both yield the same
    /// `Unauthorized("Invalid credentials")`.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        let user = self
            .users
            .find_by_credentials(&request.username, &request.password)
            .await?
            .ok_or_else(|| {
                info!("failed login for {:?}", request.username);
                AppError::Unauthorized("Invalid credentials".into())
            })?;

        let token = self.tokens.issue(user.id, &user.username)?;
        info!("user {} logged in", user.id);
        Ok(AuthResponse {
            token,
            message: "Login successful".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::MIN_HASH_COST;
    use crate::store::InMemoryStore;
    use chrono::Duration;

    fn service() -> (AuthService, Arc<TokenIssuer>, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let tokens =
            Arc::new(TokenIssuer::new("service-test-signing-key", Duration::hours(1)).unwrap());
        let service = AuthService::new(store.clone(), tokens.clone(), MIN_HASH_COST);
        (service, tokens, store)
    }

    fn register(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[actix_rt::test]
    async fn test_register_returns_verifiable_token() {
        let (service, tokens, _) = service();

        let response = service.register(register("alice", "p1")).await.unwrap();
        assert_eq!(response.message, "Registration successful");

        let claims = tokens.verify(&response.token).unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.sub, 1);
    }

    #[actix_rt::test]
    async fn test_password_is_stored_hashed() {
        let (service, _, store) = service();
        service.register(register("alice", "p1")).await.unwrap();

        let user = store.find_by_username("alice").await.unwrap().unwrap();
        assert_ne!(user.password_hash, "p1");
        assert!(user.password_hash.starts_with("$2"));
    }

    #[actix_rt::test]
    async fn test_duplicate_registration_conflicts_regardless_of_password() {
        let (service, _, _) = service();
        service.register(register("alice", "p1")).await.unwrap();

        for password in ["p1", "something-else"] {
            match service.register(register("alice", password)).await {
                Err(AppError::Conflict(_)) => {}
                other => panic!("expected conflict, got {:?}", other),
            }
        }
    }

    #[actix_rt::test]
    async fn test_empty_fields_fail_validation() {
        let (service, _, _) = service();

        for (username, password) in [("", "p1"), ("alice", ""), ("", "")] {
            assert!(matches!(
                service.register(register(username, password)).await,
                Err(AppError::ValidationError(_))
            ));
            assert!(matches!(
                service.login(login(username, password)).await,
                Err(AppError::ValidationError(_))
            ));
        }
    }

    #[actix_rt::test]
    async fn test_login_before_and_after_registration() {
        let (service, tokens, _) = service();

        assert!(matches!(
            service.login(login("alice", "p1")).await,
            Err(AppError::Unauthorized(_))
        ));

        service.register(register("alice", "p1")).await.unwrap();

        let response = service.login(login("alice", "p1")).await.unwrap();
        assert_eq!(response.message, "Login successful");
        assert_eq!(tokens.verify(&response.token).unwrap().username, "alice");

        assert!(matches!(
            service.login(login("alice", "wrong")).await,
            Err(AppError::Unauthorized(_))
        ));
    }
}
