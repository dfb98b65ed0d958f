use axum::{
    routing::{delete, post},
    Router,
};

use crate::{controllers::comment_controller::CommentController, AppState};

pub struct CommentRoutes;

impl CommentRoutes {
    pub fn protected_routes() -> Router<AppState> {
        Router::new()
            .route("/{comment_id}", delete(CommentController::delete_comment))
            .route("/{comment_id}/like", post(CommentController::toggle_like))
    }
}
