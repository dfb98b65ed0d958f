use surrealdb::{engine::any::Any, Surreal};

use crate::error::Result;

/// Idempotent schema definition, applied at every startup.
///
/// Likes are graph edges (`user -> song_like -> song`, `user -> comment_like ->
/// comment`) with a unique `(in, out)` index, so a racing duplicate RELATE
/// fails its transaction instead of creating a second row.
///
/// Deleting a comment fires `comment_cascade`, which deletes direct replies
/// (whose own deletion fires the event again) and the comment's likes.
pub const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS user SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS name ON TABLE user TYPE option<string>;
DEFINE FIELD IF NOT EXISTS image ON TABLE user TYPE option<string>;

DEFINE TABLE IF NOT EXISTS song SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS name ON TABLE song TYPE string;
DEFINE FIELD IF NOT EXISTS artist ON TABLE song TYPE option<string>;
DEFINE FIELD IF NOT EXISTS album ON TABLE song TYPE option<string>;
DEFINE FIELD IF NOT EXISTS cover_url ON TABLE song TYPE option<string>;
DEFINE FIELD IF NOT EXISTS external_url ON TABLE song TYPE option<string>;
DEFINE FIELD IF NOT EXISTS added_at ON TABLE song TYPE datetime DEFAULT time::now();
DEFINE FIELD IF NOT EXISTS trending_score ON TABLE song TYPE float DEFAULT 0.0 ASSERT $value >= 0;
DEFINE FIELD IF NOT EXISTS last_decayed_at ON TABLE song TYPE option<datetime>;
DEFINE INDEX IF NOT EXISTS song_trending_idx ON TABLE song FIELDS trending_score;
DEFINE INDEX IF NOT EXISTS song_name_idx ON TABLE song FIELDS name;

DEFINE TABLE IF NOT EXISTS comment SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS content ON TABLE comment TYPE string
    ASSERT string::len(string::trim($value)) > 0;
DEFINE FIELD IF NOT EXISTS song ON TABLE comment TYPE record<song>;
DEFINE FIELD IF NOT EXISTS user ON TABLE comment TYPE record<user>;
DEFINE FIELD IF NOT EXISTS parent ON TABLE comment TYPE option<record<comment>>;
DEFINE FIELD IF NOT EXISTS root ON TABLE comment TYPE option<record<comment>>;
DEFINE FIELD IF NOT EXISTS created_at ON TABLE comment TYPE datetime DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS comment_song_idx ON TABLE comment FIELDS song;
DEFINE INDEX IF NOT EXISTS comment_parent_idx ON TABLE comment FIELDS parent;
DEFINE INDEX IF NOT EXISTS comment_root_idx ON TABLE comment FIELDS root;
DEFINE INDEX IF NOT EXISTS comment_user_idx ON TABLE comment FIELDS user;

DEFINE TABLE IF NOT EXISTS song_like TYPE RELATION IN user OUT song;
DEFINE FIELD IF NOT EXISTS liked_at ON TABLE song_like TYPE datetime DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS song_like_unique ON TABLE song_like FIELDS in, out UNIQUE;

DEFINE TABLE IF NOT EXISTS comment_like TYPE RELATION IN user OUT comment;
DEFINE FIELD IF NOT EXISTS created_at ON TABLE comment_like TYPE datetime DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS comment_like_unique ON TABLE comment_like FIELDS in, out UNIQUE;

DEFINE EVENT IF NOT EXISTS comment_cascade ON TABLE comment WHEN $event = "DELETE" THEN {
    DELETE comment WHERE parent = $before.id;
    DELETE comment_like WHERE out = $before.id;
};
"#;

pub async fn apply_schema(db: &Surreal<Any>) -> Result<()> {
    db.query(SCHEMA).await?.check()?;

    tracing::info!("Database schema applied");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::engine::any::connect;

    #[tokio::test]
    async fn test_apply_schema_is_idempotent() {
        let db = connect("mem://").await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();

        apply_schema(&db).await.unwrap();
        apply_schema(&db).await.unwrap();
    }

    #[tokio::test]
    async fn test_negative_score_is_rejected() {
        let db = connect("mem://").await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        apply_schema(&db).await.unwrap();

        let result = db
            .query("CREATE song:bad SET name = 'Bad', trending_score = -1.0")
            .await
            .unwrap()
            .check();

        assert!(result.is_err(), "Negative trending score must be refused");
    }
}
