use serde::{Deserialize, Serialize};

/// Authoritative post-toggle state, read back after the transaction commits.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LikeToggleResult {
    pub liked: bool,
    pub count: u64,
}
