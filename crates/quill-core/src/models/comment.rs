//! Comment resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    /// Id of the post this comment belongs to.
    pub post: u64,
    /// Username of the author.
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
