use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::ideas::batch::{import_batch, BatchImportSummary, BatchInput};
use crate::ideas::editing::{create_idea, delete_idea, show_idea, update_idea, IdeaForm};
use crate::ideas::markdown::{parse, ImportItem};
use crate::ideas::ranking::{list_ideas, IdeaView};
use crate::models::idea::{IdeaRow, IdeaStatus};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
}

#[derive(Serialize)]
pub struct IdeaListResponse {
    pub ideas: Vec<IdeaView>,
    pub search: Option<String>,
}

#[derive(Serialize)]
pub struct IdeaResponse {
    pub idea: IdeaRow,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Deserialize)]
pub struct BatchImportRequest {
    pub ideas: BatchInput,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct ImportPreviewRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct ImportPreviewResponse {
    pub items: Vec<ImportItem>,
}

/// GET /api/v1/ideas
pub async fn handle_list_ideas(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(params): Query<ListQuery>,
) -> Result<Json<IdeaListResponse>, AppError> {
    let ideas = list_ideas(
        state.store.as_ref(),
        user_id,
        params.search.as_deref(),
        Utc::now(),
        state.day_boundary,
    )
    .await?;
    Ok(Json(IdeaListResponse {
        ideas,
        search: params.search,
    }))
}

/// POST /api/v1/ideas
pub async fn handle_create_idea(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(form): Json<IdeaForm>,
) -> Result<(StatusCode, Json<IdeaResponse>), AppError> {
    let idea = create_idea(state.store.as_ref(), user_id, form, Utc::now()).await?;
    Ok((
        StatusCode::CREATED,
        Json(IdeaResponse {
            idea,
            message: "Idea created successfully!",
        }),
    ))
}

/// GET /api/v1/ideas/:id
pub async fn handle_show_idea(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<IdeaRow>, AppError> {
    let idea = show_idea(state.store.as_ref(), user_id, id).await?;
    Ok(Json(idea))
}

/// PUT /api/v1/ideas/:id
pub async fn handle_update_idea(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
    Json(form): Json<IdeaForm>,
) -> Result<Json<IdeaResponse>, AppError> {
    let idea = update_idea(state.store.as_ref(), user_id, id, form, Utc::now()).await?;
    Ok(Json(IdeaResponse {
        idea,
        message: "Idea updated successfully!",
    }))
}

/// DELETE /api/v1/ideas/:id
pub async fn handle_delete_idea(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    delete_idea(state.store.as_ref(), user_id, id).await?;
    Ok(Json(MessageResponse {
        message: "Idea deleted successfully!",
    }))
}

/// POST /api/v1/ideas/batch
pub async fn handle_batch_import(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(req): Json<BatchImportRequest>,
) -> Result<(StatusCode, Json<BatchImportSummary>), AppError> {
    let status = match req.status.as_deref() {
        None => IdeaStatus::default(),
        Some(raw) => raw
            .parse::<IdeaStatus>()
            .map_err(|e| AppError::validation("status", e.to_string()))?,
    };
    let summary = import_batch(state.store.as_ref(), user_id, req.ideas, status, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// POST /api/v1/ideas/import/preview
///
/// Runs the markdown parser without writing anything, so the client can
/// review and edit the items before submitting them to the batch endpoint.
pub async fn handle_import_preview(
    CurrentUser(_): CurrentUser,
    Json(req): Json<ImportPreviewRequest>,
) -> Json<ImportPreviewResponse> {
    Json(ImportPreviewResponse {
        items: parse(&req.text),
    })
}
