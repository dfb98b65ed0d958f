pub mod comment_service;
pub mod like_service;
pub mod song_service;
pub mod trending_service;
pub mod user_service;
