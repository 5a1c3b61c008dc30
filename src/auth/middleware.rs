use std::sync::Arc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::{Claims, TokenIssuer};
use crate::error::AppError;

/// Rejects requests that lack a valid bearer token.
///
/// On success the token's [`Claims`] are stored in the request extensions for
/// downstream extractors. On failure a 401 JSON response is produced directly,
/// so wrapped handlers never run.
pub struct AuthMiddleware {
    tokens: Arc<TokenIssuer>,
}

impl AuthMiddleware {
    pub fn new(tokens: Arc<TokenIssuer>) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    tokens: Arc<TokenIssuer>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&self.tokens, &req) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(app_err) => {
                log::debug!("rejected {} {}: {}", req.method(), req.path(), app_err);
                let response = req
                    .into_response(app_err.error_response())
                    .map_into_right_body();
                Box::pin(ready(Ok(response)))
            }
        }
    }
}

fn authenticate(tokens: &TokenIssuer, req: &ServiceRequest) -> Result<Claims, AppError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Missing token".into()))?;

    let token = bearer_token(header_value.to_str().unwrap_or_default())
        .ok_or_else(|| AppError::Unauthorized("Malformed authorization header".into()))?;

    tokens.verify(token)
}

/// Returns the credential of a `Bearer` authorization value. The scheme is
/// matched case-insensitively.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
