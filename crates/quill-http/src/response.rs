//! Response type.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

use quill_core::{ApiError, Error, ErrorBody, Result};

/// A fully-read HTTP response.
///
/// Every status is represented here; only transport failures are errors.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns true for 401.
    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }

    /// The body decoded lossily as UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| Error::Decode(e.to_string()))
    }

    /// Parse the body as an error body.
    pub fn error_body(&self) -> ErrorBody {
        ErrorBody::parse(&self.body)
    }

    /// Convert into an [`ApiError`] carrying the status and parsed body.
    pub fn into_api_error(self) -> ApiError {
        ApiError::new(self.status.as_u16(), self.error_body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn response(status: u16, body: &[u8]) -> ApiResponse {
        ApiResponse::new(
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            body.to_vec(),
        )
    }

    #[test]
    fn decodes_json() {
        let value: Value = response(200, br#"{"access": "T2"}"#).json().unwrap();
        assert_eq!(value, json!({"access": "T2"}));
    }

    #[test]
    fn bad_json_is_decode_error() {
        let err = response(200, b"<html>").json::<Value>().unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn api_error_from_response() {
        let err = response(400, br#"{"title": ["This field is required."]}"#).into_api_error();
        assert_eq!(err.status, 400);
        assert_eq!(
            err.body.field_errors(),
            vec![("title".to_string(), "This field is required.".to_string())]
        );
    }

    #[test]
    fn status_helpers() {
        assert!(response(204, b"").is_success());
        assert!(response(401, b"").is_unauthorized());
        assert!(!response(403, b"").is_unauthorized());
    }
}
