use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::Claims;
use crate::error::AppError;

/// The identity carried by a verified bearer token.
///
/// Only available on routes wrapped by `AuthMiddleware`, which stores the
/// token's claims in the request extensions. The user record itself is not
/// looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub username: String,
}

impl From<&Claims> for AuthenticatedUser {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username.clone(),
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(AuthenticatedUser::from(claims))),
            None => {
                let err = AppError::Unauthorized(
                    "No verified token on request. Ensure AuthMiddleware is active.".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}
