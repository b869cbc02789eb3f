//! Typed operations against the blog backend.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

use quill_core::error::AuthError;
use quill_core::models::RegisteredUser;
use quill_core::{
    AccessToken, Comment, CredentialStore, Credentials, Error, ListOrPage, NewPost, Notification,
    Page, Post, PostPatch, PostQuery, RefreshToken, Result,
};

use crate::client::AuthClient;
use crate::config::ClientConfig;
use crate::endpoints::{self, CommentRequest, MarkAllReadRequest, TokenResponse};
use crate::request::{ApiRequest, MultipartForm};
use crate::response::ApiResponse;
use crate::transport::{ReqwestTransport, Transport};

/// A file to upload alongside a post.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// Form field name, e.g. `image`.
    pub field: String,
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

/// The blog backend's API.
///
/// All calls except [`BlogApi::login`] and [`BlogApi::register`] go through
/// [`AuthClient::send`], so an expired access token is refreshed
/// transparently.
pub struct BlogApi<T = ReqwestTransport> {
    client: AuthClient<T>,
}

impl<T> Clone for BlogApi<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<T> std::fmt::Debug for BlogApi<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogApi")
            .field("client", &self.client)
            .finish()
    }
}

impl BlogApi<ReqwestTransport> {
    /// Create an API handle with a `reqwest` transport.
    pub fn connect(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        Ok(Self::new(AuthClient::new(config, store)?))
    }
}

impl<T: Transport> BlogApi<T> {
    pub fn new(client: AuthClient<T>) -> Self {
        Self { client }
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &AuthClient<T> {
        &self.client
    }

    // ========================================================================
    // Auth
    // ========================================================================

    /// Obtain tokens for `credentials` and store them with the username.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] if the server rejects the pair with
    /// 400 or 401.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        info!("Logging in");

        let request = ApiRequest::post(self.endpoint(endpoints::TOKEN))
            .with_json(serde_json::to_value(credentials)?);
        let response = self.client.send_anonymous(&request).await?;

        if matches!(
            response.status(),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED
        ) {
            debug!(body = ?response.error_body(), "login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }
        let tokens: TokenResponse = decode(response)?;

        self.client.store().store_login(
            &AccessToken::new(tokens.access),
            &RefreshToken::new(tokens.refresh),
            credentials.username(),
        )?;

        debug!("Logged in");
        Ok(())
    }

    /// Create an account. Does not log in.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn register(&self, credentials: &Credentials) -> Result<RegisteredUser> {
        info!("Registering account");

        let request = ApiRequest::post(self.endpoint(endpoints::REGISTER))
            .with_json(serde_json::to_value(credentials)?);
        let response = self.client.send_anonymous(&request).await?;
        decode(response)
    }

    /// Forget every stored credential.
    pub fn logout(&self) -> Result<()> {
        info!("Logging out");
        self.client.store().clear()
    }

    /// The username stored at login, if any.
    pub fn whoami(&self) -> Option<String> {
        self.client.store().username()
    }

    /// Refresh the access token explicitly.
    pub async fn refresh(&self) -> Result<()> {
        self.client.refresh().await
    }

    // ========================================================================
    // Posts
    // ========================================================================

    /// List posts matching `query`.
    #[instrument(skip(self))]
    pub async fn list_posts(&self, query: &PostQuery) -> Result<Page<Post>> {
        let request = ApiRequest::get(self.endpoint(endpoints::POSTS)).with_query(query.pairs());
        self.send_json(&request).await
    }

    #[instrument(skip(self))]
    pub async fn get_post(&self, id: u64) -> Result<Post> {
        let request = ApiRequest::get(self.endpoint(&endpoints::post(id)));
        self.send_json(&request).await
    }

    #[instrument(skip(self, post), fields(title = %post.title))]
    pub async fn create_post(&self, post: &NewPost) -> Result<Post> {
        let request = ApiRequest::post(self.endpoint(endpoints::POSTS)).with_json(post.to_json());
        self.send_json(&request).await
    }

    /// Create a post with file attachments as a multipart request.
    #[instrument(skip(self, post, attachments), fields(title = %post.title, files = attachments.len()))]
    pub async fn create_post_with_attachments(
        &self,
        post: &NewPost,
        attachments: &[Attachment],
    ) -> Result<Post> {
        let mut form = MultipartForm::new();
        for (name, value) in post.form_fields() {
            form = form.text(name, value);
        }
        for attachment in attachments {
            form = form.file(
                attachment.field.clone(),
                attachment.file_name.clone(),
                attachment.mime.clone(),
                attachment.bytes.clone(),
            );
        }

        let request = ApiRequest::post(self.endpoint(endpoints::POSTS)).with_multipart(form);
        self.send_json(&request).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_post(&self, id: u64, patch: &PostPatch) -> Result<Post> {
        let request = ApiRequest::patch(self.endpoint(&endpoints::post(id))).with_json(patch.to_json());
        self.send_json(&request).await
    }

    /// Delete a post. The server must answer 204.
    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: u64) -> Result<()> {
        let request = ApiRequest::delete(self.endpoint(&endpoints::post(id)));
        self.send_expect_no_content(&request).await
    }

    /// Toggle a like. Returns whether the server accepted it.
    #[instrument(skip(self))]
    pub async fn like_post(&self, id: u64) -> Result<bool> {
        let request = ApiRequest::post(self.endpoint(&endpoints::post_like(id)));
        Ok(self.client.send(&request).await?.is_success())
    }

    // ========================================================================
    // Comments
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn list_comments(&self, post_id: u64) -> Result<Vec<Comment>> {
        let request = ApiRequest::get(self.endpoint(&endpoints::post_comments(post_id)));
        let list: ListOrPage<Comment> = self.send_json(&request).await?;
        Ok(list.into_items())
    }

    #[instrument(skip(self, content))]
    pub async fn add_comment(&self, post_id: u64, content: &str) -> Result<Comment> {
        let body = serde_json::to_value(CommentRequest {
            content: content.trim(),
        })?;
        let request =
            ApiRequest::post(self.endpoint(&endpoints::post_comments(post_id))).with_json(body);
        self.send_json(&request).await
    }

    /// Delete a comment. The server must answer 204.
    #[instrument(skip(self))]
    pub async fn delete_comment(&self, id: u64) -> Result<()> {
        let request = ApiRequest::delete(self.endpoint(&endpoints::comment(id)));
        self.send_expect_no_content(&request).await
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn unread_notifications(&self) -> Result<Vec<Notification>> {
        let request = ApiRequest::get(self.endpoint(endpoints::UNREAD_NOTIFICATIONS));
        let list: ListOrPage<Notification> = self.send_json(&request).await?;
        Ok(list.into_items())
    }

    /// Number of unread notifications.
    ///
    /// Prefers the server's `count` field, falling back to the list length.
    /// A non-success status counts as zero.
    #[instrument(skip(self))]
    pub async fn unread_count(&self) -> Result<u64> {
        let request = ApiRequest::get(self.endpoint(endpoints::UNREAD_NOTIFICATIONS));
        let response = self.client.send(&request).await?;
        if !response.is_success() {
            debug!(status = %response.status(), "unread count unavailable");
            return Ok(0);
        }

        let body: Value = response.json()?;
        if let Some(count) = body.get("count").and_then(Value::as_u64) {
            return Ok(count);
        }
        let items = match &body {
            Value::Array(items) => items.len(),
            Value::Object(map) => map
                .get("results")
                .and_then(Value::as_array)
                .map_or(0, Vec::len),
            _ => 0,
        };
        Ok(items as u64)
    }

    /// Mark every notification read. Returns whether the server accepted it.
    #[instrument(skip(self))]
    pub async fn mark_all_read(&self) -> Result<bool> {
        let body = serde_json::to_value(MarkAllReadRequest { all: true })?;
        let request = ApiRequest::patch(self.endpoint(endpoints::MARK_ALL_READ)).with_json(body);
        Ok(self.client.send(&request).await?.is_success())
    }

    /// Mark one notification read. Returns whether the server accepted it.
    #[instrument(skip(self))]
    pub async fn mark_read(&self, id: u64) -> Result<bool> {
        let request =
            ApiRequest::patch(self.endpoint(&endpoints::notification_read(id))).with_json(json!({}));
        Ok(self.client.send(&request).await?.is_success())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn endpoint(&self, path: &str) -> url::Url {
        self.client.base().endpoint(path)
    }

    async fn send_json<R: DeserializeOwned>(&self, request: &ApiRequest) -> Result<R> {
        let response = self.client.send(request).await?;
        decode(response)
    }

    async fn send_expect_no_content(&self, request: &ApiRequest) -> Result<()> {
        let response = self.client.send(request).await?;
        if response.status() == StatusCode::NO_CONTENT {
            Ok(())
        } else {
            warn!(status = %response.status(), "expected 204 No Content");
            Err(Error::Api(response.into_api_error()))
        }
    }
}

/// Decode a success body, or turn a failure status into [`Error::Api`].
fn decode<R: DeserializeOwned>(response: ApiResponse) -> Result<R> {
    if response.is_success() {
        response.json()
    } else {
        Err(Error::Api(response.into_api_error()))
    }
}
