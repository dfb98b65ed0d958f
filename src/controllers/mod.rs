pub mod comment_controller;
pub mod cron_controller;
pub mod song_controller;
pub mod trending_controller;
pub mod user_controller;
