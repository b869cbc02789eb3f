//! The network primitive the authenticated client is built on.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::trace;

use quill_core::error::TransportError;
use quill_core::{Error, Result};

use crate::config::ClientConfig;
use crate::request::{ApiRequest, MultipartForm, PartContent, RequestBody};
use crate::response::ApiResponse;

/// Sends a fully-prepared request and reads the whole response.
///
/// Implementations add no headers of their own beyond what the body
/// encoding requires, and report every HTTP status as a response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> std::result::Result<ApiResponse, TransportError>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport from client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            Error::NetworkUnavailable(TransportError::Other {
                message: format!("failed to build HTTP client: {}", e),
            })
        })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> std::result::Result<ApiResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.url().clone())
            .headers(request.headers().clone());

        builder = match request.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => {
                let bytes = serde_json::to_vec(value).map_err(|e| TransportError::Other {
                    message: format!("failed to encode JSON body: {}", e),
                })?;
                builder.body(bytes)
            }
            RequestBody::Multipart(form) => builder.multipart(encode_form(form)?),
        };

        let response = builder.send().await.map_err(classify)?;

        let status = response.status();
        let headers = response.headers().clone();
        trace!(status = %status, "HTTP response");

        let body = response.bytes().await.map_err(|e| TransportError::Body {
            message: e.to_string(),
        })?;

        Ok(ApiResponse::new(status, headers, body.to_vec()))
    }
}

fn encode_form(form: &MultipartForm) -> std::result::Result<Form, TransportError> {
    let mut encoded = Form::new();
    for part in form.parts() {
        encoded = match &part.content {
            PartContent::Text(value) => encoded.text(part.name.clone(), value.clone()),
            PartContent::File {
                file_name,
                mime,
                bytes,
            } => {
                let mut file = Part::bytes(bytes.clone()).file_name(file_name.clone());
                if let Some(mime) = mime {
                    file = file.mime_str(mime).map_err(|e| TransportError::Other {
                        message: format!("invalid MIME type '{}': {}", mime, e),
                    })?;
                }
                encoded.part(part.name.clone(), file)
            }
        };
    }
    Ok(encoded)
}

/// Map a `reqwest` error onto the transport taxonomy.
pub(crate) fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else if err.is_body() || err.is_decode() {
        TransportError::Body {
            message: err.to_string(),
        }
    } else {
        TransportError::Other {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::ApiBase;

    #[test]
    fn transport_creation() {
        let config = ClientConfig::new(ApiBase::new("http://127.0.0.1:8000").unwrap());
        assert!(ReqwestTransport::new(&config).is_ok());
    }

    #[test]
    fn rejects_bad_mime() {
        let form = MultipartForm::new().file("image", "x.bin", Some("not a mime".into()), vec![0]);
        assert!(matches!(
            encode_form(&form),
            Err(TransportError::Other { .. })
        ));
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        // Bind then drop a listener so the port is known to be closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let base = ApiBase::new(format!("http://127.0.0.1:{}", port)).unwrap();
        let transport = ReqwestTransport::new(&ClientConfig::new(base.clone())).unwrap();
        let request = ApiRequest::get(base.endpoint("/api/posts/"));

        let err = transport.execute(&request).await.unwrap_err();
        assert!(matches!(err, TransportError::Connection { .. }));
    }
}
