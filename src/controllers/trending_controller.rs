use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::{
    middlewares::mw_auth::Ctx,
    models::{
        pagination::{OffsetPage, OffsetQuery, DEFAULT_PAGE_LIMIT},
        song::SongWithStats,
    },
    services::trending_service::TrendingService,
    AppState, Error,
};

pub struct TrendingController;

impl TrendingController {
    pub async fn get_trending(
        State(state): State<AppState>,
        ctx: Option<Extension<Ctx>>,
        Query(query): Query<OffsetQuery>,
    ) -> Result<Json<OffsetPage<SongWithStats>>, Error> {
        let viewer = ctx.as_ref().map(|Extension(ctx)| ctx.user_id.as_str());

        let page = TrendingService::get_trending_songs(
            &state.db,
            viewer,
            query.limit_or(DEFAULT_PAGE_LIMIT),
            query.offset(),
        )
        .await?;

        Ok(Json(page))
    }
}
