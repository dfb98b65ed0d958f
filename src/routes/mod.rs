pub mod comment_routes;
pub mod cron_routes;
pub mod song_routes;
pub mod trending_routes;
pub mod user_routes;
