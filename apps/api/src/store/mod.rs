//! Persistence seam for ideas and votes.
//!
//! Default: `PgIdeaStore` (PostgreSQL via sqlx, full-text search in-database).
//! Tests use `MemoryIdeaStore`, which enforces the same invariants behind a single lock.
//!
//! `AppState` holds an `Arc<dyn IdeaStore>`.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::idea::{IdeaChanges, IdeaRow, NewIdea};
use crate::models::vote::VoteEventRow;
use crate::votes::ledger::{Ballot, VoteOutcome};

#[async_trait]
pub trait IdeaStore: Send + Sync {
    async fn insert_idea(&self, idea: NewIdea) -> Result<IdeaRow, AppError>;

    /// Inserts every row or none. Returns the number of rows written.
    async fn insert_batch(&self, ideas: Vec<NewIdea>) -> Result<u64, AppError>;

    async fn get_idea(&self, id: Uuid) -> Result<Option<IdeaRow>, AppError>;

    async fn update_idea(&self, id: Uuid, changes: IdeaChanges) -> Result<IdeaRow, AppError>;

    /// Deletes the idea and its vote events.
    async fn delete_idea(&self, id: Uuid) -> Result<(), AppError>;

    /// Applies a ballot to the ledger and recomputes the idea's score, atomically.
    /// Fails with `NotFound` when the idea does not exist.
    async fn record_vote(&self, ballot: Ballot) -> Result<VoteOutcome, AppError>;

    /// Ideas owned by `owner`, optionally restricted to those matching `search`.
    async fn find_ideas(
        &self,
        owner: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<IdeaRow>, AppError>;

    /// Votes cast by `voter` on `day` against any of `idea_ids`.
    async fn votes_on_day(
        &self,
        voter: Uuid,
        day: NaiveDate,
        idea_ids: &[Uuid],
    ) -> Result<Vec<VoteEventRow>, AppError>;
}
