use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::state::AppState;
use crate::votes::ledger::{cast_vote, VoteError, VoteValue};

#[derive(Deserialize)]
pub struct VoteRequest {
    pub vote: i64,
}

#[derive(Serialize)]
pub struct VoteResponse {
    pub success: bool,
    pub score: i64,
    pub user_vote: VoteValue,
    pub message: &'static str,
}

/// POST /api/v1/ideas/:id/vote
pub async fn handle_vote(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Path(id): Path<Uuid>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Json<VoteResponse>, AppError> {
    // Identity is checked before the body is looked at.
    let CurrentUser(voter) = user.ok_or(VoteError::Unauthenticated)?;
    let Json(req) = payload.map_err(|rejection| {
        AppError::validation(
            "vote",
            format!("vote must be -1 or 1 ({})", rejection.body_text()),
        )
    })?;

    let outcome = cast_vote(
        state.store.as_ref(),
        id,
        Some(voter),
        req.vote,
        Utc::now(),
        state.day_boundary,
    )
    .await?;

    let value = VoteValue::try_from(i64::from(outcome.vote.value))?;
    Ok(Json(VoteResponse {
        success: true,
        score: outcome.score,
        user_vote: value,
        message: value.message(),
    }))
}
