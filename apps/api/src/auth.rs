use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// The authenticated caller, as asserted by the upstream gateway in the
/// configured identity header (`x-user-id` by default).
///
/// Handlers that need a user take `CurrentUser` and reject with 401 when the
/// header is missing or malformed. `Option<CurrentUser>` defers that decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(state.config.identity_header.as_str())
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}
