use axum::{routing::get, Router};

use crate::{controllers::cron_controller::CronController, AppState};

pub struct CronRoutes;

impl CronRoutes {
    /// Hit by the external scheduler, which may use either verb.
    pub fn routes() -> Router<AppState> {
        Router::new().route("/decay", get(CronController::decay).post(CronController::decay))
    }
}
