use crate::{
    auth::AuthUser,
    error::AppError,
    models::{TaskInput, TaskPatch},
    response::ApiResponse,
    store::Store,
};
use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

/// Lists every task owned by the authenticated user.
///
/// ## Responses:
/// - `200 OK`: `data` is an array of tasks, each with its category resolved.
/// - `401`/`403`: Rejected by the request gate.
/// - `500 Internal Server Error`: Store failure.
#[get("")]
pub async fn get_tasks(
    user: AuthUser,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let tasks = store.list_tasks(user.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(
        "Tasks retrieved successfully",
        tasks,
    )))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Request Body:
/// `title`, `description`, `category_id`, `due_date`, `priority`,
/// `is_completed` and `reminder_minutes_before`, all required.
///
/// ## Responses:
/// - `201 Created`: `data` is the new task with category and owner resolved.
/// - `400 Bad Request`: Malformed body or failed validation.
/// - `500 Internal Server Error`: Store failure, including an unknown category.
#[post("")]
pub async fn create_task(
    user: AuthUser,
    store: web::Data<dyn Store>,
    task_data: web::Json<TaskInput>,
) -> Result<HttpResponse, AppError> {
    task_data.validate()?;

    let task = store.create_task(user.id, task_data.into_inner()).await?;
    log::debug!("user {} created task {}", user.id, task.id);

    Ok(HttpResponse::Created().json(ApiResponse::with_data(
        "Task created successfully",
        task,
    )))
}

/// Retrieves one task. Tasks owned by other users are reported as missing.
#[get("/{id}")]
pub async fn get_task(
    user: AuthUser,
    store: web::Data<dyn Store>,
    task_id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let task = store
        .find_task(user.id, task_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(
        "Task retrieved successfully",
        task,
    )))
}

/// Applies a partial update. Omitted fields keep their current values.
///
/// ## Responses:
/// - `200 OK`: `data` is the updated task.
/// - `400 Bad Request`: Malformed body or failed validation.
/// - `404 Not Found`: No such task for this user.
#[put("/{id}")]
pub async fn update_task(
    user: AuthUser,
    store: web::Data<dyn Store>,
    task_id: web::Path<i32>,
    patch: web::Json<TaskPatch>,
) -> Result<HttpResponse, AppError> {
    patch.validate()?;

    let task = store
        .update_task(user.id, task_id.into_inner(), patch.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found or access denied".into()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(
        "Task updated successfully",
        task,
    )))
}

/// Deletes a task owned by the authenticated user.
#[delete("/{id}")]
pub async fn delete_task(
    user: AuthUser,
    store: web::Data<dyn Store>,
    task_id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let task_id = task_id.into_inner();

    if !store.delete_task(user.id, task_id).await? {
        return Err(AppError::NotFound("Task not found or access denied".into()));
    }
    log::debug!("user {} deleted task {}", user.id, task_id);

    Ok(HttpResponse::Ok().json(ApiResponse::message("Task deleted successfully")))
}
