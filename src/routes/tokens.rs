use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};

use crate::{
    routes::serialize::{CredentialsRequest, RefreshRequest, TokenResponse},
    services::ServiceContext,
    state::AppState,
};

use super::ApiResult;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/tokens", post(obtain_tokens))
        .route("/tokens/", post(obtain_tokens))
        .route("/tokens/refresh", post(refresh_tokens))
        .route("/tokens/refresh/", post(refresh_tokens))
        .with_state(state)
}

async fn obtain_tokens(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsRequest>,
) -> ApiResult<TokenResponse> {
    let services = ServiceContext::from_state(&state);
    let tokens = services
        .auth(&state.auth_providers)
        .login(&body.username, &body.password)
        .await?;
    Ok(Json(tokens.into()))
}

async fn refresh_tokens(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RefreshRequest>,
) -> ApiResult<TokenResponse> {
    let services = ServiceContext::from_state(&state);
    let tokens = services
        .auth(&state.auth_providers)
        .refresh(&body.refresh)
        .await?;
    Ok(Json(tokens.into()))
}
