use surrealdb::{engine::any::Any, Surreal};

use crate::{
    helpers::thing_helpers::create_song_thing, models::database_helpers::RecordId, Error,
};

pub async fn song_exists(db: &Surreal<Any>, song_id: &str) -> Result<bool, Error> {
    let song_thing = create_song_thing(song_id);

    let song_check: Option<RecordId> = db
        .query("SELECT id FROM song WHERE id = $song")
        .bind(("song", song_thing))
        .await?
        .take(0)?;

    Ok(song_check.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::test_helpers::{seed_song, setup_db};

    #[tokio::test]
    async fn test_song_exists() {
        let db = setup_db().await;
        seed_song(&db, "4uLU6hMCjMI75M1A2tKUQC").await;

        let exists = song_exists(&db, "4uLU6hMCjMI75M1A2tKUQC").await.unwrap();
        assert!(exists, "Seeded song should exist");

        let exists = song_exists(&db, "song:4uLU6hMCjMI75M1A2tKUQC").await.unwrap();
        assert!(exists, "Prefixed id should resolve to the same song");

        let exists = song_exists(&db, "this_id_does_not_exist").await.unwrap();
        assert!(!exists, "Unknown song should not exist");
    }
}
