use std::env;

use serde::Serialize;
use surrealdb::{engine::any::Any, Surreal};

use crate::{
    helpers::thing_helpers::create_user_thing,
    models::{
        database_helpers::{CountResult, RecordId},
        pagination::OffsetPage,
        song::{SongStatsRow, SongWithStats, SONG_STATS_FIELDS},
    },
    Error,
};

/// Adds `$weight` to `$song`'s score. Runs inside the caller's transaction.
pub const ON_ENGAGEMENT_ADDED: &str = "UPDATE $song SET trending_score += $weight RETURN NONE;";

/// Removes `$weight` from `$song`'s score, never going below zero.
pub const ON_ENGAGEMENT_REMOVED: &str = "UPDATE $song SET trending_score = math::max([trending_score - $weight, 0.0]) WHERE trending_score > 0 RETURN NONE;";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendingConfig {
    pub like_weight: f64,
    pub comment_weight: f64,
    /// Scores at or below this are left alone by the decay tick.
    pub decay_epsilon: f64,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            like_weight: 1.0,
            comment_weight: 0.1,
            decay_epsilon: 0.01,
        }
    }
}

impl TrendingConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            like_weight: env_f64("TRENDING_LIKE_WEIGHT").unwrap_or(defaults.like_weight),
            comment_weight: env_f64("TRENDING_COMMENT_WEIGHT").unwrap_or(defaults.comment_weight),
            decay_epsilon: env_f64("TRENDING_DECAY_EPSILON").unwrap_or(defaults.decay_epsilon),
        }
    }
}

fn env_f64(key: &str) -> Option<f64> {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DecayReport {
    pub success: bool,
    pub songs_decayed: usize,
}

pub struct TrendingService;

impl TrendingService {
    /// Halves every score above the epsilon in one bulk statement.
    ///
    /// Not guarded against double invocation: two ticks in the same period
    /// halve twice. `last_decayed_at` records when each song was last touched.
    pub async fn decay_tick(db: &Surreal<Any>, config: &TrendingConfig) -> Result<DecayReport, Error> {
        tracing::info!("Running decay job for trending scores...");

        let sql = "UPDATE song SET trending_score = trending_score / 2.0, last_decayed_at = time::now() WHERE trending_score > $epsilon RETURN id";

        let decayed: Vec<RecordId> = db
            .query(sql)
            .bind(("epsilon", config.decay_epsilon))
            .await?
            .take(0)?;

        tracing::info!(songs_decayed = decayed.len(), "Decay job completed");

        Ok(DecayReport {
            success: true,
            songs_decayed: decayed.len(),
        })
    }

    pub async fn get_trending_songs(
        db: &Surreal<Any>,
        viewer_id: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<OffsetPage<SongWithStats>, Error> {
        let viewer = viewer_id.map(create_user_thing);

        let count_sql = "SELECT count() AS total FROM song GROUP ALL";
        let data_sql = format!(
            "SELECT {} FROM song ORDER BY trending_score DESC, added_at DESC LIMIT {} START {}",
            SONG_STATS_FIELDS, limit, offset
        );

        let mut response = db
            .query(count_sql)
            .query(data_sql)
            .bind(("viewer", viewer))
            .await?;

        let count: Option<CountResult> = response.take(0)?;
        let rows: Vec<SongStatsRow> = response.take(1)?;

        let total = count.map(|c| c.total).unwrap_or(0);
        let songs = rows
            .into_iter()
            .map(|row| SongWithStats::from_row(row, viewer_id.is_some()))
            .collect();

        Ok(OffsetPage::new(songs, limit, offset, total))
    }
}
