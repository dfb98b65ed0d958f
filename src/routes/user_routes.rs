use axum::{routing::get, Router};

use crate::{controllers::user_controller::UserController, AppState};

pub struct UserRoutes;

impl UserRoutes {
    pub fn public_routes() -> Router<AppState> {
        Router::new().route("/users/{user_id}/likes", get(UserController::get_user_likes))
    }

    pub fn protected_routes() -> Router<AppState> {
        Router::new().route("/me/likes", get(UserController::get_my_likes))
    }
}
