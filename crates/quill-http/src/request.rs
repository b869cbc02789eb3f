//! Request descriptors.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use url::Url;

/// An HTTP request as the caller describes it.
///
/// The descriptor is replayable: it owns its body, so the same value can be
/// sent again after a credential refresh with method, URL, headers and body
/// untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: RequestBody,
}

/// The body of an [`ApiRequest`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// A JSON document.
    Json(Value),
    /// A multipart form. The encoder chooses the content type and boundary.
    Multipart(MultipartForm),
}

impl RequestBody {
    /// Returns true for multipart bodies.
    pub fn is_multipart(&self) -> bool {
        matches!(self, RequestBody::Multipart(_))
    }
}

impl ApiRequest {
    /// Create a request with no extra headers and no body.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    /// A `GET` request.
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// A `POST` request.
    pub fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    /// A `PATCH` request.
    pub fn patch(url: Url) -> Self {
        Self::new(Method::PATCH, url)
    }

    /// A `DELETE` request.
    pub fn delete(url: Url) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Attach a JSON body.
    pub fn with_json(mut self, value: Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    /// Attach a multipart body.
    pub fn with_multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Add a caller header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Append query pairs to the URL.
    pub fn with_query<'a, I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        let mut pairs = pairs.into_iter().peekable();
        if pairs.peek().is_some() {
            let mut query = self.url.query_pairs_mut();
            for (name, value) in pairs {
                query.append_pair(name, &value);
            }
        }
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub(crate) fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }
}

/// A multipart form that can be encoded more than once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

/// One named part of a [`MultipartForm`].
#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub content: PartContent,
}

/// The content of a form part.
#[derive(Debug, Clone, PartialEq)]
pub enum PartContent {
    Text(String),
    File {
        file_name: String,
        mime: Option<String>,
        bytes: Vec<u8>,
    },
}

impl MultipartForm {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            content: PartContent::Text(value.into()),
        });
        self
    }

    /// Add a file field.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            content: PartContent::File {
                file_name: file_name.into(),
                mime,
                bytes,
            },
        });
        self
    }

    /// The parts in insertion order.
    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
