use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};
use log::{error, info, warn};

use todo_gate::auth::TokenIssuer;
use todo_gate::config::Config;
use todo_gate::routes;
use todo_gate::state::AppState;
use todo_gate::store::{CredentialStore, InMemoryStore, PgStore, TaskStore};

fn startup_error(err: impl std::fmt::Display) -> io::Error {
    error!("startup failed: {}", err);
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(startup_error)?;
    let tokens = Arc::new(
        TokenIssuer::new(&config.jwt_secret, config.token_ttl()).map_err(startup_error)?,
    );

    let (users, tasks): (Arc<dyn CredentialStore>, Arc<dyn TaskStore>) =
        match &config.database_url {
            Some(url) => {
                let store = Arc::new(PgStore::connect(url).await.map_err(startup_error)?);
                info!("using Postgres storage");
                (store.clone() as Arc<dyn CredentialStore>, store as Arc<dyn TaskStore>)
            }
            None => {
                warn!("DATABASE_URL not set; using in-memory storage, data is lost on restart");
                let store = Arc::new(InMemoryStore::new());
                (store.clone() as Arc<dyn CredentialStore>, store as Arc<dyn TaskStore>)
            }
        };

    let state = AppState::new(users, tasks, tokens, config.bcrypt_cost);

    info!("Starting server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config(state.clone()))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
