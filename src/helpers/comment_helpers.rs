use surrealdb::{engine::any::Any, Surreal};

use crate::{
    helpers::thing_helpers::create_comment_thing, models::comment::CommentRecord, Error,
};

/// Loads the threading/ownership fields of a comment.
pub async fn find_comment(
    db: &Surreal<Any>,
    comment_id: &str,
) -> Result<Option<CommentRecord>, Error> {
    let comment_thing = create_comment_thing(comment_id);

    let comment: Option<CommentRecord> = db
        .query("SELECT id, song, user, parent, root FROM comment WHERE id = $comment")
        .bind(("comment", comment_thing))
        .await?
        .take(0)?;

    Ok(comment)
}

pub async fn comment_exists(db: &Surreal<Any>, comment_id: &str) -> Result<bool, Error> {
    Ok(find_comment(db, comment_id).await?.is_some())
}
