use surrealdb::{
    engine::any::{connect, Any},
    Surreal,
};

use crate::{
    helpers::{schema_helpers::apply_schema, thing_helpers::create_song_thing},
    models::song::SaveSongRequest,
    services::{song_service::SongService, user_service::UserService},
};

pub async fn setup_db() -> Surreal<Any> {
    let db = connect("mem://").await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    apply_schema(&db).await.unwrap();
    db
}

pub async fn seed_user(db: &Surreal<Any>, user_id: &str, name: &str) {
    UserService::upsert_user(db, user_id, Some(name), None)
        .await
        .unwrap();
}

pub async fn seed_song(db: &Surreal<Any>, song_id: &str) {
    let request = SaveSongRequest {
        id: song_id.to_string(),
        name: format!("Track {song_id}"),
        artist: Some("Test Artist".to_string()),
        album: None,
        cover_url: None,
        external_url: Some(format!("https://open.spotify.com/track/{song_id}")),
    };
    SongService::save_song(db, request).await.unwrap();
}

pub async fn song_score(db: &Surreal<Any>, song_id: &str) -> f64 {
    let score: Option<f64> = db
        .query("SELECT VALUE trending_score FROM song WHERE id = $song")
        .bind(("song", create_song_thing(song_id)))
        .await
        .unwrap()
        .take(0)
        .unwrap();
    score.expect("song should exist")
}

pub async fn set_song_score(db: &Surreal<Any>, song_id: &str, score: f64) {
    db.query("UPDATE $song SET trending_score = $score")
        .bind(("song", create_song_thing(song_id)))
        .bind(("score", score))
        .await
        .unwrap()
        .check()
        .unwrap();
}

pub async fn count_rows(db: &Surreal<Any>, table: &str) -> u64 {
    let sql = format!("SELECT count() AS total FROM {table} GROUP ALL");
    let total: Option<u64> = db
        .query(sql)
        .await
        .unwrap()
        .take((0, "total"))
        .unwrap();
    total.unwrap_or(0)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
