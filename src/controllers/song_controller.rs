use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::{
    middlewares::mw_auth::Ctx,
    models::{
        like::LikeToggleResult,
        song::{SaveSongRequest, SaveSongResult, SongWithStats},
    },
    services::{like_service::LikeService, song_service::SongService},
    AppState, Error,
};

pub struct SongController;

impl SongController {
    pub async fn save_song(
        State(state): State<AppState>,
        Extension(_ctx): Extension<Ctx>,
        Json(payload): Json<SaveSongRequest>,
    ) -> Result<(StatusCode, Json<SaveSongResult>), Error> {
        let result = SongService::save_song(&state.db, payload).await?;

        let status = if result.created {
            StatusCode::CREATED
        } else {
            StatusCode::OK
        };

        Ok((status, Json(result)))
    }

    pub async fn get_song(
        State(state): State<AppState>,
        ctx: Option<Extension<Ctx>>,
        Path(song_id): Path<String>,
    ) -> Result<Json<SongWithStats>, Error> {
        let viewer = ctx.as_ref().map(|Extension(ctx)| ctx.user_id.as_str());

        let song = SongService::get_song(&state.db, &song_id, viewer).await?;

        Ok(Json(song))
    }

    pub async fn toggle_like(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(song_id): Path<String>,
    ) -> Result<Json<LikeToggleResult>, Error> {
        let result =
            LikeService::toggle_song_like(&state.db, &state.trending, &ctx.user_id, &song_id)
                .await?;

        Ok(Json(result))
    }
}
