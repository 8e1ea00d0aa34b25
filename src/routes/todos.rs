use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    auth::{AdminRole, CurrentUser},
    error::AppError,
    middleware::AuthRoleGuard,
    routes::serialize::{
        CreateTodoRequest, OwnedTodoResponse, PatchTodoRequest, TodoResponse, serialize_todo,
    },
    services::{ServiceContext, todo_service::TODO_NOT_FOUND},
    state::AppState,
};

use super::ApiResult;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/", get(list_todos).post(create_todo))
        .route("/todos/clear", post(clear_todos))
        .route(
            "/todos/{id}",
            get(get_todo).patch(patch_todo).delete(delete_todo),
        )
        .route("/todos/{id}/check", post(check_todo))
        .route("/todos/{id}/uncheck", post(uncheck_todo))
        .with_state(state)
}

/// Parses an `{id}` segment. Integers outside the stored id range are
/// reported as missing, anything else that is not an integer as a 400.
fn todo_id(raw: &str) -> Result<i32, AppError> {
    if let Ok(id) = raw.parse::<i32>() {
        return Ok(id);
    }
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::not_found(TODO_NOT_FOUND));
    }
    Err(AppError::bad_request(format!("Invalid id \"{raw}\": expected an integer.")))
}

async fn list_todos(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Vec<TodoResponse>> {
    let todos = ServiceContext::from_state(&state)
        .todo()
        .list_for_user(user.id)
        .await?;
    Ok(Json(todos.into_iter().map(serialize_todo).collect()))
}

async fn create_todo(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<OwnedTodoResponse>), AppError> {
    let todo = ServiceContext::from_state(&state)
        .todo()
        .create(user.id, body.title.as_deref(), body.body.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(todo.into())))
}

async fn get_todo(
    _user: CurrentUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<TodoResponse> {
    let id = todo_id(&id)?;
    let todo = ServiceContext::from_state(&state).todo().get(id).await?;
    Ok(Json(serialize_todo(todo)))
}

async fn patch_todo(
    _user: CurrentUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<PatchTodoRequest>,
) -> ApiResult<OwnedTodoResponse> {
    let id = todo_id(&id)?;
    let todo = ServiceContext::from_state(&state)
        .todo()
        .update(id, body.into())
        .await?;
    Ok(Json(todo.into()))
}

async fn delete_todo(
    _user: CurrentUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = todo_id(&id)?;
    ServiceContext::from_state(&state).todo().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn check_todo(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    set_checked(&state, &user, todo_id(&id)?, true).await
}

async fn uncheck_todo(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    set_checked(&state, &user, todo_id(&id)?, false).await
}

async fn set_checked(
    state: &AppState,
    user: &CurrentUser,
    id: i32,
    checked: bool,
) -> Result<StatusCode, AppError> {
    ServiceContext::from_state(state)
        .todo()
        .set_checked(user.id, id, checked)
        .await?;
    Ok(StatusCode::OK)
}

async fn clear_todos(
    AuthRoleGuard { user, .. }: AuthRoleGuard<AdminRole>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, AppError> {
    let removed = ServiceContext::from_state(&state).todo().clear_all().await?;
    tracing::info!(admin = %user.username, removed, "admin cleared todos");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::todo_id;
    use crate::services::todo_service::TODO_NOT_FOUND;

    #[test]
    fn id_segment_parsing() {
        assert_eq!(todo_id("42").expect("in range"), 42);

        let err = todo_id("99999999999").expect_err("out of range");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), TODO_NOT_FOUND);

        let err = todo_id("-99999999999").expect_err("out of range");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        for raw in ["abc", "1a", "-", "1.5"] {
            let err = todo_id(raw).expect_err("not a number");
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{raw}");
        }
    }
}
