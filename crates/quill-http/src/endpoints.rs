//! Endpoint paths and request/response bodies.

use serde::{Deserialize, Serialize};

// ============================================================================
// Endpoint Paths
// ============================================================================

/// Obtain an access/refresh pair.
pub const TOKEN: &str = "/api/auth/token/";

/// Exchange a refresh token for a new access token.
pub const REFRESH: &str = "/api/auth/refresh/";

/// Create an account.
pub const REGISTER: &str = "/api/auth/register/";

/// Post collection.
pub const POSTS: &str = "/api/posts/";

/// Unread notifications for the current user.
pub const UNREAD_NOTIFICATIONS: &str = "/api/notifications/unread/";

/// Mark every notification read.
pub const MARK_ALL_READ: &str = "/api/notifications/mark_read/";

pub fn post(id: u64) -> String {
    format!("/api/posts/{}/", id)
}

pub fn post_like(id: u64) -> String {
    format!("/api/posts/{}/like/", id)
}

pub fn post_comments(id: u64) -> String {
    format!("/api/posts/{}/comments/", id)
}

pub fn comment(id: u64) -> String {
    format!("/api/comments/{}/", id)
}

pub fn notification_read(id: u64) -> String {
    format!("/api/notifications/{}/read/", id)
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response from the token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access: String,
    pub refresh: String,
}

/// Request body for the refresh endpoint.
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Response from the refresh endpoint. Other fields are ignored.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    pub access: Option<String>,
}

/// Request body for adding a comment.
#[derive(Debug, Serialize)]
pub struct CommentRequest<'a> {
    pub content: &'a str,
}

/// Request body for marking every notification read.
#[derive(Debug, Serialize)]
pub struct MarkAllReadRequest {
    pub all: bool,
}
