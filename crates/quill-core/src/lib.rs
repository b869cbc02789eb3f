//! quill-core - Core types and traits for the quill blog API client.

pub mod credentials;
pub mod error;
pub mod models;
pub mod store;
pub mod tokens;
pub mod types;

pub use credentials::Credentials;
pub use error::{ApiError, Error, ErrorBody};
pub use models::{Comment, ListOrPage, NewPost, Notification, Page, Post, PostPatch, PostQuery};
pub use store::{CredentialKey, CredentialStore, MemoryCredentialStore};
pub use tokens::{AccessToken, RefreshToken};
pub use types::ApiBase;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
