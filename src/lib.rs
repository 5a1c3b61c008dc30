#![doc = "The `todo_gate` library crate."]
#![doc = ""]
#![doc = "A task-tracking HTTP API whose task routes are gated by HS256 bearer tokens."]
#![doc = "Users register and log in with a username and password; the resulting token"]
#![doc = "is verified statelessly on every request to `/items`."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use error::AppError;
pub use state::AppState;
