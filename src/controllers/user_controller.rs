use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use crate::{
    middlewares::mw_auth::Ctx,
    models::{
        pagination::{OffsetPage, OffsetQuery, DEFAULT_PAGE_LIMIT},
        song::SongWithStats,
    },
    services::song_service::SongService,
    AppState, Error,
};

pub struct UserController;

impl UserController {
    pub async fn get_my_likes(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Query(query): Query<OffsetQuery>,
    ) -> Result<Json<OffsetPage<SongWithStats>>, Error> {
        let page = SongService::get_liked_songs(
            &state.db,
            &ctx.user_id,
            Some(&ctx.user_id),
            query.limit_or(DEFAULT_PAGE_LIMIT),
            query.offset(),
        )
        .await?;

        Ok(Json(page))
    }

    pub async fn get_user_likes(
        State(state): State<AppState>,
        ctx: Option<Extension<Ctx>>,
        Path(user_id): Path<String>,
        Query(query): Query<OffsetQuery>,
    ) -> Result<Json<OffsetPage<SongWithStats>>, Error> {
        let viewer = ctx.as_ref().map(|Extension(ctx)| ctx.user_id.as_str());

        let page = SongService::get_liked_songs(
            &state.db,
            &user_id,
            viewer,
            query.limit_or(DEFAULT_PAGE_LIMIT),
            query.offset(),
        )
        .await?;

        Ok(Json(page))
    }
}
