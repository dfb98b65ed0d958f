use std::collections::HashMap;

use serde::Deserialize;
use surrealdb::{engine::any::Any, sql::Thing, Surreal};

use crate::{
    error::Result,
    helpers::{
        song_helpers::song_exists,
        thing_helpers::{create_song_thing, create_user_thing, thing_key},
        user_helpers::user_exists,
    },
    models::{
        database_helpers::CountResult,
        pagination::OffsetPage,
        song::{SaveSongRequest, SaveSongResult, SongStatsRow, SongWithStats, SONG_STATS_FIELDS},
    },
    Error,
};

pub struct SongService;

impl SongService {
    fn validate_save_request(request: &SaveSongRequest) -> Result<()> {
        if request.id.trim().is_empty() {
            return Err(Error::InvalidInput {
                reason: "Song id is required".to_string(),
            });
        }
        if request.name.trim().is_empty() {
            return Err(Error::InvalidInput {
                reason: "Song name is required".to_string(),
            });
        }
        Ok(())
    }

    /// Saves a catalog track. Saving an already known id is a no-op.
    pub async fn save_song(db: &Surreal<Any>, request: SaveSongRequest) -> Result<SaveSongResult> {
        Self::validate_save_request(&request)?;

        let song_id = request.id.trim().to_string();

        if song_exists(db, &song_id).await? {
            return Ok(SaveSongResult {
                id: song_id,
                created: false,
            });
        }

        let sql = r#"
            INSERT IGNORE INTO song {
                id: $song,
                name: $name,
                artist: $artist,
                album: $album,
                cover_url: $cover_url,
                external_url: $external_url,
                added_at: time::now(),
                trending_score: 0.0
            } RETURN NONE
        "#;

        db.query(sql)
            .bind(("song", create_song_thing(&song_id)))
            .bind(("name", request.name.trim().to_string()))
            .bind(("artist", request.artist))
            .bind(("album", request.album))
            .bind(("cover_url", request.cover_url))
            .bind(("external_url", request.external_url))
            .await?
            .check()?;

        tracing::info!(song_id = %song_id, "song saved");

        Ok(SaveSongResult {
            id: song_id,
            created: true,
        })
    }

    pub async fn get_song(
        db: &Surreal<Any>,
        song_id: &str,
        viewer_id: Option<&str>,
    ) -> Result<SongWithStats> {
        let sql = format!("SELECT {} FROM song WHERE id = $song", SONG_STATS_FIELDS);

        let row: Option<SongStatsRow> = db
            .query(sql)
            .bind(("song", create_song_thing(song_id)))
            .bind(("viewer", viewer_id.map(create_user_thing)))
            .await?
            .take(0)?;

        row.map(|row| SongWithStats::from_row(row, viewer_id.is_some()))
            .ok_or(Error::SongNotFound {
                id: song_id.to_string(),
            })
    }

    /// Songs liked by `owner_id`, most recent like first. The like flag on
    /// each song reflects `viewer_id`, not the owner.
    pub async fn get_liked_songs(
        db: &Surreal<Any>,
        owner_id: &str,
        viewer_id: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<OffsetPage<SongWithStats>> {
        if !user_exists(db, owner_id).await? {
            return Err(Error::UserNotFound {
                id: owner_id.to_string(),
            });
        }

        let owner_thing = create_user_thing(owner_id);

        #[derive(Deserialize)]
        struct LikedSong {
            out: Thing,
        }

        let count_sql = "SELECT count() AS total FROM song_like WHERE `in` = $owner GROUP ALL";
        let page_sql = format!(
            "SELECT out, liked_at FROM song_like WHERE `in` = $owner ORDER BY liked_at DESC LIMIT {} START {}",
            limit, offset
        );

        let mut response = db
            .query(count_sql)
            .query(page_sql)
            .bind(("owner", owner_thing))
            .await?;

        let count: Option<CountResult> = response.take(0)?;
        let liked: Vec<LikedSong> = response.take(1)?;

        let total = count.map(|c| c.total).unwrap_or(0);
        if liked.is_empty() {
            return Ok(OffsetPage::new(Vec::new(), limit, offset, total));
        }

        let song_things: Vec<Thing> = liked.into_iter().map(|l| l.out).collect();
        let details_sql = format!("SELECT {} FROM song WHERE id IN $songs", SONG_STATS_FIELDS);

        let rows: Vec<SongStatsRow> = db
            .query(details_sql)
            .bind(("songs", song_things.clone()))
            .bind(("viewer", viewer_id.map(create_user_thing)))
            .await?
            .take(0)?;

        let mut by_id: HashMap<String, SongStatsRow> = rows
            .into_iter()
            .map(|row| (thing_key(&row.id), row))
            .collect();

        let songs = song_things
            .iter()
            .filter_map(|thing| by_id.remove(&thing_key(thing)))
            .map(|row| SongWithStats::from_row(row, viewer_id.is_some()))
            .collect();

        Ok(OffsetPage::new(songs, limit, offset, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::test_helpers::{count_rows, seed_song, seed_user, setup_db};
    use crate::services::{
        comment_service::CommentService, like_service::LikeService,
        trending_service::TrendingConfig,
    };

    fn request(id: &str, name: &str) -> SaveSongRequest {
        SaveSongRequest {
            id: id.to_string(),
            name: name.to_string(),
            artist: Some("Daft Punk".to_string()),
            album: Some("Discovery".to_string()),
            cover_url: None,
            external_url: None,
        }
    }

    #[tokio::test]
    async fn test_save_song_is_idempotent() {
        let db = setup_db().await;

        let first = SongService::save_song(&db, request("s1", "One More Time"))
            .await
            .unwrap();
        assert_eq!(first, SaveSongResult { id: "s1".to_string(), created: true });

        let second = SongService::save_song(&db, request("s1", "Renamed"))
            .await
            .unwrap();
        assert_eq!(second, SaveSongResult { id: "s1".to_string(), created: false });

        assert_eq!(count_rows(&db, "song").await, 1);
        let song = SongService::get_song(&db, "s1", None).await.unwrap();
        assert_eq!(song.name, "One More Time");
        assert_eq!(song.trending_score, 0.0);
    }

    #[tokio::test]
    async fn test_catalog_uris_are_distinct_songs() {
        let db = setup_db().await;

        let a = SongService::save_song(&db, request("spotify:track:AAA", "First"))
            .await
            .unwrap();
        let b = SongService::save_song(&db, request("spotify:track:BBB", "Second"))
            .await
            .unwrap();
        assert!(a.created);
        assert_eq!(b, SaveSongResult { id: "spotify:track:BBB".to_string(), created: true });
        assert_eq!(count_rows(&db, "song").await, 2);

        let song = SongService::get_song(&db, "spotify:track:BBB", None).await.unwrap();
        assert_eq!(song.id, "spotify:track:BBB");
        assert_eq!(song.name, "Second");
    }

    #[tokio::test]
    async fn test_save_song_requires_id_and_name() {
        let db = setup_db().await;

        let err = SongService::save_song(&db, request("  ", "x")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));

        let err = SongService::save_song(&db, request("s1", "")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));

        assert_eq!(count_rows(&db, "song").await, 0);
    }

    #[tokio::test]
    async fn test_get_song_with_counts() {
        let db = setup_db().await;
        let config = TrendingConfig::default();
        seed_user(&db, "u1", "Ada").await;
        seed_song(&db, "s1").await;

        LikeService::toggle_song_like(&db, &config, "u1", "s1")
            .await
            .unwrap();
        let top = CommentService::add_comment(&db, &config, "s1", "u1", "love it", None)
            .await
            .unwrap();
        CommentService::add_comment(&db, &config, "s1", "u1", "me too", Some(&top.id))
            .await
            .unwrap();

        let song = SongService::get_song(&db, "s1", Some("u1")).await.unwrap();
        assert_eq!(song.like_count, 1);
        assert_eq!(song.comment_count, 2);
        assert!(song.user_has_liked);

        let err = SongService::get_song(&db, "missing", None).await.unwrap_err();
        assert!(matches!(err, Error::SongNotFound { .. }));
    }

    #[tokio::test]
    async fn test_liked_songs_newest_first() {
        let db = setup_db().await;
        let config = TrendingConfig::default();
        seed_user(&db, "owner", "Ada").await;
        seed_user(&db, "viewer", "Grace").await;
        for id in ["s1", "s2", "s3"] {
            seed_song(&db, id).await;
            LikeService::toggle_song_like(&db, &config, "owner", id)
                .await
                .unwrap();
        }
        LikeService::toggle_song_like(&db, &config, "viewer", "s2")
            .await
            .unwrap();

        let page = SongService::get_liked_songs(&db, "owner", Some("viewer"), 2, 0)
            .await
            .unwrap();
        let ids: Vec<&str> = page.data.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s3", "s2"]);
        assert_eq!(page.total, 3);
        assert!(page.has_more);
        assert!(!page.data[0].user_has_liked);
        assert!(page.data[1].user_has_liked);

        let rest = SongService::get_liked_songs(&db, "owner", None, 2, 2)
            .await
            .unwrap();
        assert_eq!(rest.data.len(), 1);
        assert_eq!(rest.data[0].id, "s1");
        assert!(!rest.has_more);
    }

    #[tokio::test]
    async fn test_liked_songs_unknown_user() {
        let db = setup_db().await;

        let err = SongService::get_liked_songs(&db, "ghost", None, 10, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UserNotFound { .. }));
    }
}
