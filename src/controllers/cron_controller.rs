use axum::{extract::State, Json};

use crate::{
    services::trending_service::{DecayReport, TrendingService},
    AppState, Error,
};

pub struct CronController;

impl CronController {
    pub async fn decay(State(state): State<AppState>) -> Result<Json<DecayReport>, Error> {
        let report = TrendingService::decay_tick(&state.db, &state.trending).await?;
        Ok(Json(report))
    }
}
