use surrealdb::{engine::any::Any, Surreal};

use crate::{
    helpers::thing_helpers::create_user_thing, models::database_helpers::RecordId, Error,
};

pub async fn user_exists(db: &Surreal<Any>, user_id: &str) -> Result<bool, Error> {
    let user_thing = create_user_thing(user_id);

    let user_check: Option<RecordId> = db
        .query("SELECT id FROM user WHERE id = $user")
        .bind(("user", user_thing))
        .await?
        .take(0)?;

    Ok(user_check.is_some())
}
