use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::idea::{IdeaChanges, IdeaRow, NewIdea};
use crate::models::vote::VoteEventRow;
use crate::store::IdeaStore;
use crate::votes::ledger::{upsert_vote, Ballot, VoteOutcome};
use crate::votes::scoring::recompute_score;

/// Rows per multi-row INSERT during batch import. All chunks share one transaction.
pub const INSERT_CHUNK_SIZE: usize = 100;

#[derive(Clone)]
pub struct PgIdeaStore {
    pool: PgPool,
}

impl PgIdeaStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdeaStore for PgIdeaStore {
    async fn insert_idea(&self, idea: NewIdea) -> Result<IdeaRow, AppError> {
        let row = sqlx::query_as::<_, IdeaRow>(
            r#"
            INSERT INTO ideas (id, user_id, title, content, status, score, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, 0, $6, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(idea.user_id)
        .bind(&idea.title)
        .bind(&idea.content)
        .bind(idea.status.as_str())
        .bind(idea.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_batch(&self, ideas: Vec<NewIdea>) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for chunk in ideas.chunks(INSERT_CHUNK_SIZE) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO ideas (id, user_id, title, content, status, score, created_at, updated_at) ",
            );
            builder.push_values(chunk, |mut row, idea| {
                row.push_bind(Uuid::new_v4())
                    .push_bind(idea.user_id)
                    .push_bind(idea.title.clone())
                    .push_bind(idea.content.clone())
                    .push_bind(idea.status.as_str())
                    .push_bind(0_i64)
                    .push_bind(idea.created_at)
                    .push_bind(idea.created_at);
            });
            inserted += builder.build().execute(&mut *tx).await?.rows_affected();
        }

        // Dropping `tx` on an early return above rolls every chunk back.
        tx.commit().await?;
        info!("Batch inserted {inserted} ideas in one transaction");
        Ok(inserted)
    }

    async fn get_idea(&self, id: Uuid) -> Result<Option<IdeaRow>, AppError> {
        Ok(
            sqlx::query_as::<_, IdeaRow>("SELECT * FROM ideas WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn update_idea(&self, id: Uuid, changes: IdeaChanges) -> Result<IdeaRow, AppError> {
        sqlx::query_as::<_, IdeaRow>(
            r#"
            UPDATE ideas
            SET title = $2, content = $3, status = $4, updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.content)
        .bind(changes.status.as_str())
        .bind(changes.updated_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Idea {id} not found")))
    }

    async fn delete_idea(&self, id: Uuid) -> Result<(), AppError> {
        // idea_votes rows go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM ideas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Idea {id} not found")));
        }
        Ok(())
    }

    async fn record_vote(&self, ballot: Ballot) -> Result<VoteOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        // Row lock on the idea serializes concurrent votes on it until commit.
        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM ideas WHERE id = $1 FOR UPDATE")
                .bind(ballot.idea_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(AppError::NotFound(format!(
                "Idea {} not found",
                ballot.idea_id
            )));
        }

        let vote = upsert_vote(&mut *tx, &ballot).await?;
        let score = recompute_score(&mut *tx, ballot.idea_id).await?;
        tx.commit().await?;

        Ok(VoteOutcome { vote, score })
    }

    async fn find_ideas(
        &self,
        owner: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<IdeaRow>, AppError> {
        // Owner filter, text match and ordering happen in one statement so
        // other users' rows never leave the database.
        Ok(sqlx::query_as::<_, IdeaRow>(
            r#"
            SELECT *
            FROM ideas
            WHERE user_id = $1
              AND (
                $2::TEXT IS NULL
                OR to_tsvector('simple'::regconfig, title || ' ' || coalesce(content, ''))
                   @@ plainto_tsquery('simple'::regconfig, $2)
              )
            ORDER BY score DESC, created_at DESC, id DESC
            "#,
        )
        .bind(owner)
        .bind(search)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn votes_on_day(
        &self,
        voter: Uuid,
        day: NaiveDate,
        idea_ids: &[Uuid],
    ) -> Result<Vec<VoteEventRow>, AppError> {
        Ok(sqlx::query_as::<_, VoteEventRow>(
            "SELECT * FROM idea_votes WHERE user_id = $1 AND vote_day = $2 AND idea_id = ANY($3)",
        )
        .bind(voter)
        .bind(day)
        .bind(idea_ids)
        .fetch_all(&self.pool)
        .await?)
    }
}
