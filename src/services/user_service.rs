use surrealdb::{engine::any::Any, Surreal};

use crate::{helpers::thing_helpers::create_user_thing, Error};

pub struct UserService;

impl UserService {
    /// Mirrors the identity provider's display info into the `user` table.
    pub async fn upsert_user(
        db: &Surreal<Any>,
        user_id: &str,
        name: Option<&str>,
        image: Option<&str>,
    ) -> Result<(), Error> {
        let user_thing = create_user_thing(user_id);

        db.query("UPSERT $user SET name = $name, image = $image RETURN NONE")
            .bind(("user", user_thing))
            .bind(("name", name.map(str::to_string)))
            .bind(("image", image.map(str::to_string)))
            .await?
            .check()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::test_helpers::setup_db;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct UserRecord {
        name: Option<String>,
        image: Option<String>,
    }

    #[tokio::test]
    async fn test_upsert_user_updates_display_info() {
        let db = setup_db().await;

        UserService::upsert_user(&db, "u1", Some("Ada"), None)
            .await
            .unwrap();
        UserService::upsert_user(&db, "u1", Some("Ada L."), Some("https://img/ada.png"))
            .await
            .unwrap();

        let users: Vec<UserRecord> = db.query("SELECT * FROM user").await.unwrap().take(0).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name.as_deref(), Some("Ada L."));
        assert_eq!(users[0].image.as_deref(), Some("https://img/ada.png"));
    }
}
