use axum::{routing::get, Router};

use crate::{controllers::trending_controller::TrendingController, AppState};

pub struct TrendingRoutes;

impl TrendingRoutes {
    pub fn routes() -> Router<AppState> {
        Router::new().route("/", get(TrendingController::get_trending))
    }
}
