use serde::{Deserialize, Serialize};

/// Public author info attached to every comment.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CommentAuthor {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
}
