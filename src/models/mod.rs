pub mod comment;
pub mod like;
pub mod song;
pub mod user;

pub mod database_helpers;
pub mod pagination;
