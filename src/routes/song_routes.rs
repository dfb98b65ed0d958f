use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    controllers::{comment_controller::CommentController, song_controller::SongController},
    AppState,
};

pub struct SongRoutes;

impl SongRoutes {
    pub fn public_routes() -> Router<AppState> {
        Router::new()
            .route("/{song_id}", get(SongController::get_song))
            .route("/{song_id}/comments", get(CommentController::get_comments))
    }

    pub fn protected_routes() -> Router<AppState> {
        Router::new()
            .route("/", post(SongController::save_song))
            .route("/{song_id}/like", post(SongController::toggle_like))
            .route("/{song_id}/comments", post(CommentController::add_comment))
    }
}
