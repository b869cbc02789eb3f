//! quill-http - Authenticated HTTP client and typed API for the blog backend.
//!
//! [`AuthClient`] attaches the stored bearer token to every request and, on
//! a 401, refreshes the token once and replays the request once.
//! [`BlogApi`] builds the backend's operations on top of it.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use quill_core::{ApiBase, Credentials, MemoryCredentialStore, PostQuery};
//! use quill_http::{BlogApi, ClientConfig};
//!
//! # async fn example() -> Result<(), quill_core::Error> {
//! let base = ApiBase::new("http://127.0.0.1:8000")?;
//! let api = BlogApi::connect(ClientConfig::new(base), Arc::new(MemoryCredentialStore::new()))?;
//!
//! api.login(&Credentials::new("alice", "hunter2")).await?;
//! let page = api.list_posts(&PostQuery::default()).await?;
//! for post in page.results {
//!     println!("{}: {}", post.id, post.title);
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod client;
mod config;
pub mod endpoints;
mod refresh;
mod request;
mod response;
mod transport;

pub use api::{Attachment, BlogApi};
pub use client::AuthClient;
pub use config::ClientConfig;
pub use request::{ApiRequest, FormPart, MultipartForm, PartContent, RequestBody};
pub use response::ApiResponse;
pub use transport::{ReqwestTransport, Transport};

pub use reqwest::{Method, StatusCode, header};
