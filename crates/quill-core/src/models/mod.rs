//! Backend resource types.
//!
//! These mirror the JSON the backend serializes. Read-only counters and
//! AI-derived fields default when a response omits them (creation responses
//! are not annotated with counts).

mod comment;
mod notification;
mod page;
mod post;

pub use comment::Comment;
pub use notification::Notification;
pub use page::{ListOrPage, Page};
pub use post::{NewPost, Post, PostPatch, PostQuery};

use serde::{Deserialize, Serialize};

/// The body returned by the register endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub id: u64,
    pub username: String,
}
