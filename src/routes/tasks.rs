use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::TaskInput,
    state::AppState,
};
use actix_web::{delete, get, http::header, post, put, web, HttpResponse, Responder};
use log::{debug, info};
use validator::Validate;

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Task {} not found", id))
}

/// Lists every task, ordered by id.
///
/// ## Responses:
/// - `200 OK`: JSON array of tasks (possibly empty).
/// - `401 Unauthorized`: missing or invalid bearer token.
#[get("")]
pub async fn list_items(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.list().await?;
    debug!("user {} listed {} tasks", user.user_id, tasks.len());
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task.
///
/// ## Request Body:
/// `{"name": string, "isComplete": bool}`; `isComplete` defaults to `false`.
///
/// ## Responses:
/// - `201 Created`: the new task, with `Location: /items/{id}`.
/// - `400 Bad Request`: malformed body or name longer than 100 characters.
/// - `401 Unauthorized`: missing or invalid bearer token.
#[post("")]
pub async fn create_item(
    state: web::Data<AppState>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = state.tasks.create(task_data.into_inner()).await?;
    info!("user {} created task {}", user.user_id, task.id);

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/items/{}", task.id)))
        .json(task))
}

/// Fetches a single task.
#[get("/{id}")]
pub async fn get_item(
    state: web::Data<AppState>,
    task_id: web::Path<i32>,
    _user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = task_id.into_inner();
    let task = state.tasks.get(id).await?.ok_or_else(|| not_found(id))?;
    Ok(HttpResponse::Ok().json(task))
}

/// Replaces a task's name and completion flag.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `404 Not Found`: no task with that id.
#[put("/{id}")]
pub async fn update_item(
    state: web::Data<AppState>,
    task_id: web::Path<i32>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let id = task_id.into_inner();

    let task = state
        .tasks
        .update(id, task_data.into_inner())
        .await?
        .ok_or_else(|| not_found(id))?;
    info!("user {} updated task {}", user.user_id, task.id);

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `404 Not Found`: no task with that id.
#[delete("/{id}")]
pub async fn delete_item(
    state: web::Data<AppState>,
    task_id: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = task_id.into_inner();

    if !state.tasks.delete(id).await? {
        return Err(not_found(id));
    }
    info!("user {} deleted task {}", user.user_id, id);

    Ok(HttpResponse::NoContent().finish())
}
