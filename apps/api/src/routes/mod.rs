pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::ideas::handlers as ideas;
use crate::state::AppState;
use crate::votes::handlers as votes;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Ideas
        .route(
            "/api/v1/ideas",
            get(ideas::handle_list_ideas).post(ideas::handle_create_idea),
        )
        .route("/api/v1/ideas/batch", post(ideas::handle_batch_import))
        .route(
            "/api/v1/ideas/import/preview",
            post(ideas::handle_import_preview),
        )
        .route(
            "/api/v1/ideas/:id",
            get(ideas::handle_show_idea)
                .put(ideas::handle_update_idea)
                .delete(ideas::handle_delete_idea),
        )
        // Votes
        .route("/api/v1/ideas/:id/vote", post(votes::handle_vote))
        .with_state(state)
}
