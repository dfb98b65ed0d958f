use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use crate::{
    middlewares::mw_auth::Ctx,
    models::{
        comment::{AddCommentRequest, CommentNode, CommentPage, CommentPageQuery, DeletedComment},
        like::LikeToggleResult,
    },
    services::{comment_service::CommentService, like_service::LikeService},
    AppState, Error,
};

pub struct CommentController;

impl CommentController {
    pub async fn get_comments(
        State(state): State<AppState>,
        ctx: Option<Extension<Ctx>>,
        Path(song_id): Path<String>,
        Query(query): Query<CommentPageQuery>,
    ) -> Result<Json<CommentPage>, Error> {
        let viewer = ctx.as_ref().map(|Extension(ctx)| ctx.user_id.as_str());

        let page = CommentService::fetch_comment_page(&state.db, &song_id, &query, viewer).await?;

        Ok(Json(page))
    }

    pub async fn add_comment(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(song_id): Path<String>,
        Json(payload): Json<AddCommentRequest>,
    ) -> Result<(StatusCode, Json<CommentNode>), Error> {
        let comment = CommentService::add_comment(
            &state.db,
            &state.trending,
            &song_id,
            &ctx.user_id,
            &payload.content,
            payload.parent_id.as_deref(),
        )
        .await?;

        Ok((StatusCode::CREATED, Json(comment)))
    }

    pub async fn delete_comment(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(comment_id): Path<String>,
    ) -> Result<Json<DeletedComment>, Error> {
        let result =
            CommentService::delete_comment(&state.db, &state.trending, &comment_id, &ctx.user_id)
                .await?;

        Ok(Json(result))
    }

    pub async fn toggle_like(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(comment_id): Path<String>,
    ) -> Result<Json<LikeToggleResult>, Error> {
        let result = LikeService::toggle_comment_like(&state.db, &ctx.user_id, &comment_id).await?;

        Ok(Json(result))
    }
}
