//! Vote ledger: one vote event per (idea, voter, calendar day).
//!
//! A second vote on the same day replaces the first in place. The unique
//! index `idea_votes_one_per_day` backs this up in PostgreSQL, so two racing
//! requests resolve to a single row instead of a duplicate.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::Serialize;
use sqlx::PgConnection;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::vote::VoteEventRow;
use crate::store::IdeaStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoteError {
    #[error("vote must be -1 or 1 (got {0})")]
    InvalidVoteValue(i64),

    #[error("authentication required to vote")]
    Unauthenticated,
}

impl From<VoteError> for AppError {
    fn from(err: VoteError) -> Self {
        match err {
            VoteError::InvalidVoteValue(_) => AppError::validation("vote", err.to_string()),
            VoteError::Unauthenticated => AppError::Unauthorized,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "i16")]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    pub fn as_i16(self) -> i16 {
        match self {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }

    /// User-facing confirmation for this vote.
    pub fn message(self) -> &'static str {
        match self {
            VoteValue::Up => "Idea liked!",
            VoteValue::Down => "Idea disliked!",
        }
    }
}

impl From<VoteValue> for i16 {
    fn from(value: VoteValue) -> Self {
        value.as_i16()
    }
}

impl TryFrom<i64> for VoteValue {
    type Error = VoteError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            1 => Ok(VoteValue::Up),
            -1 => Ok(VoteValue::Down),
            other => Err(VoteError::InvalidVoteValue(other)),
        }
    }
}

/// Where one voting day ends and the next begins: server-local midnight,
/// expressed as a fixed offset from UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    offset: FixedOffset,
}

impl DayBoundary {
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// `None` when the offset is outside ±24h.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(|offset| Self { offset })
    }

    /// Calendar day `at` falls on.
    pub fn day_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::utc()
    }
}

/// A validated vote, pinned to the day it counts against.
#[derive(Debug, Clone)]
pub struct Ballot {
    pub idea_id: Uuid,
    pub voter: Uuid,
    pub value: VoteValue,
    pub day: NaiveDate,
    pub at: DateTime<Utc>,
}

/// Result of a committed vote: the ledger row and the idea's new score.
#[derive(Debug, Clone)]
pub struct VoteOutcome {
    pub vote: VoteEventRow,
    pub score: i64,
}

/// Records `raw_value` from `voter` against `idea_id` for the day containing `now`.
///
/// Identity is checked first, then the value; nothing is written unless both pass.
pub async fn cast_vote(
    store: &dyn IdeaStore,
    idea_id: Uuid,
    voter: Option<Uuid>,
    raw_value: i64,
    now: DateTime<Utc>,
    boundary: DayBoundary,
) -> Result<VoteOutcome, AppError> {
    let voter = voter.ok_or(VoteError::Unauthenticated)?;
    let value = VoteValue::try_from(raw_value)?;

    let ballot = Ballot {
        idea_id,
        voter,
        value,
        day: boundary.day_of(now),
        at: now,
    };
    let outcome = store.record_vote(ballot).await?;

    info!(
        "Vote {} by {voter} on idea {idea_id}; score now {}",
        value.as_i16(),
        outcome.score
    );
    Ok(outcome)
}

/// Inserts the ballot, or overwrites the value of the voter's existing event for that day.
/// Must run inside the transaction that also recomputes the score.
pub async fn upsert_vote(
    conn: &mut PgConnection,
    ballot: &Ballot,
) -> Result<VoteEventRow, sqlx::Error> {
    sqlx::query_as::<_, VoteEventRow>(
        r#"
        INSERT INTO idea_votes (id, idea_id, user_id, value, vote_day, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        ON CONFLICT (idea_id, user_id, vote_day)
        DO UPDATE SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(ballot.idea_id)
    .bind(ballot.voter)
    .bind(ballot.value.as_i16())
    .bind(ballot.day)
    .bind(ballot.at)
    .fetch_one(conn)
    .await
}
