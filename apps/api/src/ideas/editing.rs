//! Single-idea create, show, update and delete. Only the owner may touch an idea.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::idea::{truncate_title, IdeaChanges, IdeaRow, IdeaStatus, NewIdea};
use crate::store::IdeaStore;

/// Create/update payload as submitted.
#[derive(Debug, Clone, Deserialize)]
pub struct IdeaForm {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A form that passed validation, with any title overflow already moved into content.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidIdea {
    pub title: String,
    pub content: Option<String>,
    pub status: IdeaStatus,
}

impl IdeaForm {
    pub fn validate(self) -> Result<ValidIdea, AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::validation("title", "The title field is required."));
        }
        let status = match self.status.as_deref() {
            None => IdeaStatus::default(),
            Some(raw) => raw
                .parse::<IdeaStatus>()
                .map_err(|e| AppError::validation("status", e.to_string()))?,
        };
        let (title, content) = split_title(&self.title, self.content.as_deref());
        Ok(ValidIdea {
            title,
            content,
            status,
        })
    }
}

/// Cuts `title` to the column width. Whatever was cut off is kept by
/// prepending it to `content`, separated by a blank line.
pub fn split_title(title: &str, content: Option<&str>) -> (String, Option<String>) {
    let kept = truncate_title(title);
    let overflow = &title[kept.len()..];
    if overflow.is_empty() {
        return (kept.to_string(), content.map(String::from));
    }

    let content = match content.filter(|c| !c.is_empty()) {
        Some(existing) => format!("{overflow}\n\n{existing}"),
        None => overflow.to_string(),
    };
    (kept.to_string(), Some(content))
}

async fn load_owned(store: &dyn IdeaStore, caller: Uuid, id: Uuid) -> Result<IdeaRow, AppError> {
    let idea = store
        .get_idea(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Idea {id} not found")))?;
    if idea.user_id != caller {
        return Err(AppError::Forbidden);
    }
    Ok(idea)
}

pub async fn create_idea(
    store: &dyn IdeaStore,
    owner: Uuid,
    form: IdeaForm,
    now: DateTime<Utc>,
) -> Result<IdeaRow, AppError> {
    let valid = form.validate()?;
    let idea = store
        .insert_idea(NewIdea {
            user_id: owner,
            title: valid.title,
            content: valid.content,
            status: valid.status,
            created_at: now,
        })
        .await?;
    info!("Created idea {} for user {owner}", idea.id);
    Ok(idea)
}

pub async fn show_idea(store: &dyn IdeaStore, caller: Uuid, id: Uuid) -> Result<IdeaRow, AppError> {
    load_owned(store, caller, id).await
}

pub async fn update_idea(
    store: &dyn IdeaStore,
    caller: Uuid,
    id: Uuid,
    form: IdeaForm,
    now: DateTime<Utc>,
) -> Result<IdeaRow, AppError> {
    load_owned(store, caller, id).await?;
    let valid = form.validate()?;
    store
        .update_idea(
            id,
            IdeaChanges {
                title: valid.title,
                content: valid.content,
                status: valid.status,
                updated_at: now,
            },
        )
        .await
}

pub async fn delete_idea(store: &dyn IdeaStore, caller: Uuid, id: Uuid) -> Result<(), AppError> {
    load_owned(store, caller, id).await?;
    store.delete_idea(id).await?;
    info!("Deleted idea {id} for user {caller}");
    Ok(())
}
