//! Authenticated HTTP client with one-shot token refresh and replay.

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use tracing::{debug, instrument, trace, warn};

use quill_core::error::InvalidInputError;
use quill_core::{ApiBase, CredentialStore, Error, Result};

use crate::config::ClientConfig;
use crate::request::ApiRequest;
use crate::response::ApiResponse;
use crate::transport::{ReqwestTransport, Transport};

/// HTTP client that attaches the stored bearer token and recovers once from
/// an expired one.
///
/// A call to [`AuthClient::send`] makes at most three network requests, in
/// this order: the initial attempt, a refresh if the attempt got 401, and a
/// single replay if the refresh succeeded. The replay path does not go back
/// through the 401 check, so it cannot trigger another refresh.
///
/// Concurrent calls that all receive 401 refresh independently; nothing
/// coalesces them into one refresh.
///
/// Cheap to clone; clones share the transport and credential store.
pub struct AuthClient<T = ReqwestTransport> {
    inner: Arc<ClientInner<T>>,
}

struct ClientInner<T> {
    base: ApiBase,
    transport: T,
    store: Arc<dyn CredentialStore>,
}

impl<T> Clone for AuthClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl AuthClient<ReqwestTransport> {
    /// Create a client using a `reqwest` transport.
    pub fn new(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config.base, transport, store))
    }
}

impl<T: Transport> AuthClient<T> {
    /// Create a client over any transport.
    pub fn with_transport(base: ApiBase, transport: T, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                base,
                transport,
                store,
            }),
        }
    }

    /// Returns the backend base URL.
    pub fn base(&self) -> &ApiBase {
        &self.inner.base
    }

    /// Returns the credential store.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.inner.store
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// Send a request with the current access token, refreshing and
    /// replaying once on 401.
    ///
    /// Every HTTP status comes back as `Ok`. A 401 is returned when there is
    /// no refresh token, when the refresh fails, or when the replay itself
    /// is rejected.
    ///
    /// # Errors
    ///
    /// [`Error::NetworkUnavailable`] if the initial attempt or the replay
    /// could not reach the server. [`Error::InvalidInput`] if the stored
    /// access token cannot be sent as a header.
    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let response = self.attempt(request).await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }
        self.recover(request, response).await
    }

    /// Send a request without a bearer token and without refresh handling.
    ///
    /// Used for the token, register and refresh endpoints.
    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    pub async fn send_anonymous(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let outgoing = self.prepare(request, false)?;
        Ok(self.inner.transport.execute(&outgoing).await?)
    }

    async fn attempt(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let outgoing = self.prepare(request, true)?;
        let response = self.inner.transport.execute(&outgoing).await?;
        trace!(status = %response.status(), "attempt complete");
        Ok(response)
    }

    async fn recover(&self, request: &ApiRequest, unauthorized: ApiResponse) -> Result<ApiResponse> {
        let Some(refresh_token) = self.inner.store.refresh_token() else {
            debug!("401 with no refresh token stored");
            return Ok(unauthorized);
        };

        match self.refresh_with(&refresh_token).await {
            Ok(_) => self.replay_with_refreshed_credential(request).await,
            Err(err) => {
                debug!(error = %err, "token refresh failed, returning original response");
                Ok(unauthorized)
            }
        }
    }

    async fn replay_with_refreshed_credential(&self, request: &ApiRequest) -> Result<ApiResponse> {
        debug!("replaying request with refreshed access token");
        let response = self.attempt(request).await?;
        if response.is_unauthorized() {
            warn!("replay was rejected after a successful refresh");
        }
        Ok(response)
    }

    /// Apply the JSON and credential headers on top of the caller's headers.
    pub(crate) fn prepare(&self, request: &ApiRequest, with_credential: bool) -> Result<ApiRequest> {
        let mut outgoing = request.clone();
        let multipart = request.body().is_multipart();
        let headers = outgoing.headers_mut();

        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if !multipart {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        if with_credential && let Some(token) = self.inner.store.access_token() {
            let mut value = HeaderValue::from_str(&token.bearer()).map_err(|e| {
                Error::from(InvalidInputError::HeaderValue {
                    name: AUTHORIZATION.to_string(),
                    reason: e.to_string(),
                })
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(outgoing)
    }
}

impl<T> std::fmt::Debug for AuthClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("base", &self.inner.base)
            .field("store", &self.inner.store)
            .finish()
    }
}
