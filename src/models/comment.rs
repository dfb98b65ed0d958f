use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::{Datetime, Thing};

use crate::models::user::CommentAuthor;

pub const DEFAULT_COMMENT_LIMIT: u32 = 10;
pub const MAX_COMMENT_LIMIT: u32 = 50;
pub const MAX_COMMENT_LENGTH: usize = 1000;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CommentSort {
    /// Most liked first, newest first on ties.
    #[default]
    Top,
    Recent,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CommentPageQuery {
    pub sort: Option<CommentSort>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl CommentPageQuery {
    pub fn sort(&self) -> CommentSort {
        self.sort.unwrap_or_default()
    }

    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_COMMENT_LIMIT)
            .clamp(1, MAX_COMMENT_LIMIT)
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    pub content: String,
    pub parent_id: Option<String>,
}

/// Minimal comment record used for ownership and threading checks.
#[derive(Debug, Deserialize, Clone)]
pub struct CommentRecord {
    pub id: Thing,
    pub song: Thing,
    pub user: Thing,
    pub parent: Option<Thing>,
    pub root: Option<Thing>,
}

/// Flat comment row with its live like count and viewer flag.
#[derive(Debug, Deserialize, Clone)]
pub struct CommentRow {
    pub id: Thing,
    pub content: String,
    pub created_at: Datetime,
    pub parent: Option<Thing>,
    pub author: Thing,
    pub author_name: Option<String>,
    pub author_image: Option<String>,
    pub likes: u64,
    pub current_user_liked: bool,
}

/// Projection for `CommentRow`. Expects `$viewer` to be bound.
pub const COMMENT_ROW_FIELDS: &str = r#"
    id, content, created_at, parent,
    user AS author,
    user.name AS author_name,
    user.image AS author_image,
    array::len(<-comment_like) AS likes,
    ($viewer INSIDE <-comment_like<-user) AS current_user_liked
"#;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CommentNode {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user: CommentAuthor,
    pub likes: u64,
    pub current_user_liked: bool,
    pub replies: Vec<CommentNode>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CommentPage {
    pub comments: Vec<CommentNode>,
    pub has_more: bool,
    pub total_count: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DeletedComment {
    pub id: String,
    pub deleted: bool,
}
