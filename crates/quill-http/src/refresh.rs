//! Access token refresh.
//!
//! A refresh never fails loudly inside [`AuthClient::send`]: every failure
//! becomes a [`RefreshError`] that the caller logs before falling back to the
//! original 401. The store is only written once the server has returned a
//! usable access token.

use thiserror::Error;
use tracing::{debug, info, instrument};

use quill_core::error::{AuthError, TransportError};
use quill_core::{AccessToken, Error, RefreshToken, Result};

use crate::client::AuthClient;
use crate::endpoints::{REFRESH, RefreshRequest, RefreshResponse};
use crate::request::ApiRequest;
use crate::transport::Transport;

/// Why a refresh did not produce a new access token.
#[derive(Debug, Error)]
pub(crate) enum RefreshError {
    #[error("refresh endpoint answered HTTP {status}")]
    Rejected { status: u16 },

    #[error("refresh response has no access token")]
    MissingAccess,

    #[error("refresh response is not valid JSON: {0}")]
    Decode(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("could not build refresh request: {0}")]
    Request(Error),

    #[error("could not store refreshed access token: {0}")]
    Store(Error),
}

impl<T: Transport> AuthClient<T> {
    /// Exchange `refresh_token` for a new access token and store it.
    #[instrument(skip_all)]
    pub(crate) async fn refresh_with(
        &self,
        refresh_token: &RefreshToken,
    ) -> std::result::Result<AccessToken, RefreshError> {
        debug!("refreshing access token");

        let body = serde_json::to_value(RefreshRequest {
            refresh: refresh_token.as_str(),
        })
        .map_err(|e| RefreshError::Request(e.into()))?;
        let request = ApiRequest::post(self.base().endpoint(REFRESH)).with_json(body);
        let outgoing = self
            .prepare(&request, false)
            .map_err(RefreshError::Request)?;

        let response = self.transport().execute(&outgoing).await?;
        if !response.is_success() {
            return Err(RefreshError::Rejected {
                status: response.status().as_u16(),
            });
        }

        let body: RefreshResponse =
            serde_json::from_slice(response.body()).map_err(|e| RefreshError::Decode(e.to_string()))?;
        let access = body
            .access
            .filter(|a| !a.is_empty())
            .map(AccessToken::new)
            .ok_or(RefreshError::MissingAccess)?;

        self.store()
            .store_access_token(&access)
            .map_err(RefreshError::Store)?;

        debug!("access token refreshed");
        Ok(access)
    }

    /// Refresh the access token explicitly.
    ///
    /// # Errors
    ///
    /// [`AuthError::RefreshTokenInvalid`] if no refresh token is stored or the
    /// server does not issue a new access token, [`Error::NetworkUnavailable`]
    /// if the server cannot be reached, [`Error::Storage`] if the new token
    /// cannot be persisted.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        info!("Refreshing access token");

        let refresh_token = self
            .store()
            .refresh_token()
            .ok_or(AuthError::RefreshTokenInvalid)?;

        match self.refresh_with(&refresh_token).await {
            Ok(_) => Ok(()),
            Err(RefreshError::Transport(err)) => Err(Error::NetworkUnavailable(err)),
            Err(RefreshError::Store(err)) | Err(RefreshError::Request(err)) => Err(err),
            Err(err) => {
                debug!(error = %err, "refresh rejected");
                Err(AuthError::RefreshTokenInvalid.into())
            }
        }
    }
}
