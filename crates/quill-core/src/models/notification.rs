//! Notification resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A notification addressed to the logged-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    /// Username of the recipient.
    pub user: String,
    pub message: String,
    /// The post the notification refers to, if any.
    #[serde(default)]
    pub post: Option<u64>,
    /// The comment the notification refers to, if any.
    #[serde(default)]
    pub comment: Option<u64>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
