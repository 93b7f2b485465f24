use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VoteEventRow {
    pub id: Uuid,
    pub idea_id: Uuid,
    pub user_id: Uuid,
    pub value: i16, // -1 or 1
    pub vote_day: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
