pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

use crate::auth::AuthMiddleware;
use crate::error::AppError;
use crate::state::AppState;

/// Registers state, the public auth routes and the token-gated `/items` routes.
///
/// Use as `App::new().configure(routes::config(state))`.
pub fn config(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let gate = AuthMiddleware::new(state.tokens.clone());
        cfg.app_data(web::Data::new(state))
            .app_data(json_config())
            .service(health::health)
            .service(auth::register)
            .service(auth::login)
            .service(
                web::scope("/items")
                    .wrap(gate)
                    .service(tasks::list_items)
                    .service(tasks::create_item)
                    .service(tasks::get_item)
                    .service(tasks::update_item)
                    .service(tasks::delete_item),
            );
    }
}

/// Malformed or incomplete JSON bodies become JSON 400 responses.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(format!("Invalid JSON body: {}", err)).into())
}
