use std::{marker::PhantomData, sync::Arc};

use axum::{extract::FromRequestParts, http::header, http::request::Parts};

use crate::{
    auth::{CurrentUser, RequiredRole},
    error::AppError,
    services::ServiceContext,
    state::AppState,
};

// Bearer token -> user known to the active provider.
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>().cloned() {
            return Ok(user);
        }

        let auth = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::unauthorized("Authentication credentials were not provided.")
            })?;

        let token = auth
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::unauthorized("Missing/invalid Authorization header"))?;

        let services = ServiceContext::from_state(state);
        let user = services.auth(&state.auth_providers).verify(token).await?;

        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

pub struct AuthRoleGuard<R: RequiredRole> {
    pub user: CurrentUser,
    _marker: PhantomData<R>,
}

impl<R> FromRequestParts<Arc<AppState>> for AuthRoleGuard<R>
where
    R: RequiredRole,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;

        if !R::permits(&user) {
            return Err(AppError::forbidden(
                "You do not have permission to perform this action.",
            ));
        }

        Ok(Self {
            user,
            _marker: PhantomData,
        })
    }
}
