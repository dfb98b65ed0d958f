use std::time::Duration;

use surrealdb::{engine::any::Any, sql::Thing, Surreal};

use crate::{
    helpers::{
        comment_helpers::comment_exists,
        song_helpers::song_exists,
        thing_helpers::{create_comment_thing, create_song_thing, create_user_thing},
    },
    models::like::LikeToggleResult,
    services::trending_service::{TrendingConfig, ON_ENGAGEMENT_ADDED, ON_ENGAGEMENT_REMOVED},
    Error,
};

/// Attempts per toggle before a write conflict is surfaced.
const MAX_TOGGLE_ATTEMPTS: u32 = 5;

/// Conflicts raised when two toggles on the same pair overlap: the optimistic
/// commit check, or the unique `(in, out)` index refusing a second relation.
fn is_write_conflict(err: &surrealdb::Error) -> bool {
    let message = err.to_string();
    message.contains("can be retried") || message.contains("already contains")
}

pub struct LikeService;

impl LikeService {
    /// Builds the toggle transaction for one like relation table.
    ///
    /// `on_added` / `on_removed` are extra statements committed together with
    /// the relation change.
    fn toggle_sql(table_name: &str, on_added: &str, on_removed: &str) -> String {
        format!(
            r#"
            BEGIN TRANSACTION;
            LET $existing = (SELECT VALUE id FROM {table} WHERE `in` = $user AND out = $target);
            IF array::len($existing) > 0 {{
                DELETE {table} WHERE `in` = $user AND out = $target RETURN NONE;
                {on_removed}
            }} ELSE {{
                RELATE $user->{table}->$target RETURN NONE;
                {on_added}
            }};
            COMMIT TRANSACTION;
            "#,
            table = table_name,
            on_added = on_added,
            on_removed = on_removed,
        )
    }

    /// Runs the toggle transaction, replaying it when a concurrent toggle on
    /// the same pair wins the commit. The replay sees the winner's row, so two
    /// overlapping toggles end like two sequential ones.
    ///
    /// `$song` is bound to the target; only song toggles reference it.
    async fn commit_toggle(
        db: &Surreal<Any>,
        sql: &str,
        user_thing: &Thing,
        target_thing: &Thing,
        weight: f64,
    ) -> Result<(), Error> {
        let mut attempt = 1;
        loop {
            let outcome = db
                .query(sql)
                .bind(("user", user_thing.clone()))
                .bind(("target", target_thing.clone()))
                .bind(("song", target_thing.clone()))
                .bind(("weight", weight))
                .await
                .and_then(|response| response.check());

            match outcome {
                Ok(_) => return Ok(()),
                Err(err) if attempt < MAX_TOGGLE_ATTEMPTS && is_write_conflict(&err) => {
                    tracing::debug!(attempt, target = %target_thing, "like toggle conflicted, retrying");
                    tokio::time::sleep(Duration::from_millis(5 * u64::from(attempt))).await;
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Reads the committed like state back from storage.
    async fn read_like_state(
        db: &Surreal<Any>,
        table_name: &str,
        user_thing: Thing,
        target_thing: Thing,
    ) -> Result<LikeToggleResult, Error> {
        let sql = format!(
            "SELECT array::len(<-{table}) AS count, ($user INSIDE <-{table}<-user) AS liked FROM $target",
            table = table_name
        );

        let state: Option<LikeToggleResult> = db
            .query(sql)
            .bind(("user", user_thing))
            .bind(("target", target_thing))
            .await?
            .take(0)?;

        state.ok_or_else(|| Error::DbError(format!("like target vanished from {table_name}")))
    }

    pub async fn toggle_song_like(
        db: &Surreal<Any>,
        config: &TrendingConfig,
        user_id: &str,
        song_id: &str,
    ) -> Result<LikeToggleResult, Error> {
        if !song_exists(db, song_id).await? {
            return Err(Error::SongNotFound {
                id: song_id.to_string(),
            });
        }

        let user_thing = create_user_thing(user_id);
        let song_thing = create_song_thing(song_id);

        let sql = Self::toggle_sql("song_like", ON_ENGAGEMENT_ADDED, ON_ENGAGEMENT_REMOVED);

        Self::commit_toggle(db, &sql, &user_thing, &song_thing, config.like_weight).await?;

        let state = Self::read_like_state(db, "song_like", user_thing, song_thing).await?;

        tracing::debug!(user_id, song_id, liked = state.liked, count = state.count, "song like toggled");

        Ok(state)
    }

    pub async fn toggle_comment_like(
        db: &Surreal<Any>,
        user_id: &str,
        comment_id: &str,
    ) -> Result<LikeToggleResult, Error> {
        if !comment_exists(db, comment_id).await? {
            return Err(Error::CommentNotFound {
                id: comment_id.to_string(),
            });
        }

        let user_thing = create_user_thing(user_id);
        let comment_thing = create_comment_thing(comment_id);

        let sql = Self::toggle_sql("comment_like", "", "");

        Self::commit_toggle(db, &sql, &user_thing, &comment_thing, 0.0).await?;

        let state = Self::read_like_state(db, "comment_like", user_thing, comment_thing).await?;

        tracing::debug!(user_id, comment_id, liked = state.liked, count = state.count, "comment like toggled");

        Ok(state)
    }
}
