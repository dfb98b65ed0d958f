pub mod comment_helpers;
pub mod schema_helpers;
pub mod song_helpers;
pub mod thing_helpers;
pub mod user_helpers;

#[cfg(test)]
pub mod test_helpers;
