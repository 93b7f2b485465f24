use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Width of the `ideas.title` column, in characters.
pub const MAX_TITLE_CHARS: usize = 255;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeaStatus {
    #[default]
    Draft,
    Active,
    Archived,
    Completed,
}

#[derive(Debug, Error)]
#[error("status must be one of draft, active, archived, completed (got '{0}')")]
pub struct ParseStatusError(pub String);

impl IdeaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaStatus::Draft => "draft",
            IdeaStatus::Active => "active",
            IdeaStatus::Archived => "archived",
            IdeaStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for IdeaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdeaStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(IdeaStatus::Draft),
            "active" => Ok(IdeaStatus::Active),
            "archived" => Ok(IdeaStatus::Archived),
            "completed" => Ok(IdeaStatus::Completed),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl TryFrom<String> for IdeaStatus {
    type Error = ParseStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IdeaRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: IdeaStatus,
    /// Cached sum of all vote values. Only written by `votes::scoring`.
    pub score: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row about to be inserted. Score always starts at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIdea {
    pub user_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub status: IdeaStatus,
    pub created_at: DateTime<Utc>,
}

/// Owner edits applied to an existing row.
#[derive(Debug, Clone)]
pub struct IdeaChanges {
    pub title: String,
    pub content: Option<String>,
    pub status: IdeaStatus,
    pub updated_at: DateTime<Utc>,
}

/// Returns the longest prefix of `title` that fits the title column.
pub fn truncate_title(title: &str) -> &str {
    match title.char_indices().nth(MAX_TITLE_CHARS) {
        Some((byte_idx, _)) => &title[..byte_idx],
        None => title,
    }
}
