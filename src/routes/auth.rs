use crate::{
    auth::{LoginRequest, RegisterRequest},
    error::AppError,
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates an account and returns `{token, message}`.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let response = state.auth.register(register_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Login user
///
/// Verifies the credentials and returns `{token, message}`.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let response = state.auth.login(login_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
