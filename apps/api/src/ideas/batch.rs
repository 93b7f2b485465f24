//! Batch import: normalizes a pasted blob or an itemized list into idea rows
//! and persists them all-or-nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::ideas::markdown::ImportItem;
use crate::models::idea::{truncate_title, IdeaStatus, NewIdea};
use crate::store::IdeaStore;

pub const MAX_BATCH_SIZE: usize = 1000;

/// The two accepted payload shapes for `ideas`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BatchInput {
    /// One idea per non-blank line; no markdown handling.
    Legacy(String),
    /// Already itemized, e.g. by the markdown parser.
    Structured(Vec<ImportItem>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("Please provide at least one idea.")]
    EmptyBatch,

    #[error("Maximum {max} ideas can be imported at once.")]
    BatchTooLarge { count: usize, max: usize },
}

impl From<BatchError> for AppError {
    fn from(err: BatchError) -> Self {
        AppError::validation("ideas", err.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct BatchImportSummary {
    pub imported: u64,
    pub message: String,
}

fn legacy_items(text: &str) -> Vec<ImportItem> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ImportItem::titled)
        .collect()
}

fn structured_items(items: Vec<ImportItem>) -> Vec<ImportItem> {
    items
        .into_iter()
        .filter(|item| !item.title.trim().is_empty())
        .collect()
}

/// Maps a batch payload to rows sharing one status and one timestamp.
pub fn normalize(
    input: BatchInput,
    status: IdeaStatus,
    owner: Uuid,
    now: DateTime<Utc>,
) -> Result<Vec<NewIdea>, BatchError> {
    let items = match input {
        BatchInput::Legacy(text) => legacy_items(&text),
        BatchInput::Structured(items) => structured_items(items),
    };

    if items.is_empty() {
        return Err(BatchError::EmptyBatch);
    }
    if items.len() > MAX_BATCH_SIZE {
        return Err(BatchError::BatchTooLarge {
            count: items.len(),
            max: MAX_BATCH_SIZE,
        });
    }

    Ok(items
        .into_iter()
        .map(|item| NewIdea {
            user_id: owner,
            title: truncate_title(&item.title).to_string(),
            content: item.description,
            status,
            created_at: now,
        })
        .collect())
}

/// Validates and inserts a batch for `owner`. Nothing is written on any error.
pub async fn import_batch(
    store: &dyn IdeaStore,
    owner: Uuid,
    input: BatchInput,
    status: IdeaStatus,
    now: DateTime<Utc>,
) -> Result<BatchImportSummary, AppError> {
    let rows = normalize(input, status, owner, now).map_err(|e| {
        warn!("Rejected batch import for user {owner}: {e}");
        e
    })?;

    let imported = store.insert_batch(rows).await?;
    info!("Imported {imported} ideas for user {owner}");

    Ok(BatchImportSummary {
        imported,
        message: format!("Successfully imported {imported} ideas!"),
    })
}
