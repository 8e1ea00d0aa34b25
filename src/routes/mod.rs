use std::sync::Arc;

use axum::{Json, Router, middleware::from_fn};
use tower_http::trace::TraceLayer;

use crate::{
    error::AppError,
    middleware::{catch_panic_layer, json_error_middleware},
    state::AppState,
};

pub mod serialize;
pub mod todos;
pub mod tokens;
pub mod users;

pub type ApiResult<T> = Result<Json<T>, AppError>;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(todos::router(state.clone()))
        .merge(tokens::router(state.clone()))
        .merge(users::router(state))
}

/// The router wrapped in the tower layers every request passes through.
pub fn app(state: Arc<AppState>) -> Router {
    router(state)
        .layer(from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http())
}
