use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::{Datetime, Thing};

use crate::helpers::thing_helpers::thing_key;

/// Track metadata as resolved by the catalog lookup.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SaveSongRequest {
    pub id: String,
    pub name: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub cover_url: Option<String>,
    pub external_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SaveSongResult {
    pub id: String,
    pub created: bool,
}

/// Song row joined with its live engagement counts.
#[derive(Debug, Deserialize, Clone)]
pub struct SongStatsRow {
    pub id: Thing,
    pub name: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub cover_url: Option<String>,
    pub external_url: Option<String>,
    pub added_at: Datetime,
    pub trending_score: f64,
    pub last_decayed_at: Option<Datetime>,
    pub like_count: u64,
    pub comment_count: u64,
    pub user_has_liked: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SongWithStats {
    pub id: String,
    pub name: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub cover_url: Option<String>,
    pub external_url: Option<String>,
    pub added_at: DateTime<Utc>,
    pub trending_score: f64,
    pub last_decayed_at: Option<DateTime<Utc>>,
    pub like_count: u64,
    pub comment_count: u64,
    pub user_has_liked: bool,
}

impl SongWithStats {
    /// `viewer_known` is false for anonymous callers, whose flag is always false.
    pub fn from_row(row: SongStatsRow, viewer_known: bool) -> Self {
        Self {
            id: thing_key(&row.id),
            name: row.name,
            artist: row.artist,
            album: row.album,
            cover_url: row.cover_url,
            external_url: row.external_url,
            added_at: row.added_at.0,
            trending_score: row.trending_score,
            last_decayed_at: row.last_decayed_at.map(|d| d.0),
            like_count: row.like_count,
            comment_count: row.comment_count,
            user_has_liked: viewer_known && row.user_has_liked,
        }
    }
}

/// Projection shared by every song listing. Expects `$viewer` to be bound.
pub const SONG_STATS_FIELDS: &str = r#"
    id, name, artist, album, cover_url, external_url, added_at,
    trending_score, last_decayed_at,
    array::len(<-song_like) AS like_count,
    array::len((SELECT VALUE id FROM comment WHERE song = $parent.id)) AS comment_count,
    ($viewer INSIDE <-song_like<-user) AS user_has_liked
"#;
