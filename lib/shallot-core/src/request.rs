//! HTTP request values.
//!
//! A [`Request`] is owned by the caller and lent mutably to a pipeline for the
//! duration of one invocation, so middlewares can rewrite it in place.
//! Use [`Request::builder`] to construct requests with headers, query
//! parameters, and bodies, or [`Request::empty`] as a blank starting point.
//!
//! # Example
//!
//! ```
//! use shallot_core::{Method, Request};
//!
//! let request = Request::builder(Method::Get, "https://api.example.com".parse().unwrap())
//!     .header("Accept", "application/json")
//!     .query("page", "1")
//!     .build()
//!     .unwrap();
//! assert_eq!(request.header("accept"), Some("application/json"));
//! ```

use base64::Engine;
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Version};
use url::Url;

use crate::{ContentType, Error, Method, Result};

/// An HTTP request with method, URL, protocol version, headers, and body.
///
/// No field is ever in an unusable state: the header map and the body always
/// exist, and an absent URL reports empty scheme, host and path.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Option<Url>,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
}

impl Default for Request {
    fn default() -> Self {
        Self::empty()
    }
}

impl Request {
    /// Creates a request without headers and with an empty body.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            url: Some(url),
            method,
            ..Self::empty()
        }
    }

    /// Creates a blank request.
    ///
    /// The method is `GET`, the URL is unset, the version is `HTTP/1.1`,
    /// and both headers and body are empty. Middlewares may override anything.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            method: Method::Get,
            url: None,
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: Url) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Replace the HTTP method.
    pub fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    /// Request URL, if one was set.
    #[must_use]
    pub const fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Mutable access to the URL, if one was set.
    pub fn url_mut(&mut self) -> Option<&mut Url> {
        self.url.as_mut()
    }

    /// Replace the URL.
    pub fn set_url(&mut self, url: Url) {
        self.url = Some(url);
    }

    /// URL scheme, empty when no URL is set.
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.url.as_ref().map_or("", Url::scheme)
    }

    /// URL host, empty when no URL (or no host) is set.
    #[must_use]
    pub fn host(&self) -> &str {
        self.url.as_ref().and_then(Url::host_str).unwrap_or_default()
    }

    /// URL path, empty when no URL is set.
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.as_ref().map_or("", Url::path)
    }

    /// Protocol version.
    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    /// Replace the protocol version.
    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    /// Protocol name, e.g. `"HTTP/1.1"`.
    #[must_use]
    pub fn proto(&self) -> &'static str {
        match self.version {
            Version::HTTP_09 => "HTTP/0.9",
            Version::HTTP_10 => "HTTP/1.0",
            Version::HTTP_2 => "HTTP/2.0",
            Version::HTTP_3 => "HTTP/3.0",
            _ => "HTTP/1.1",
        }
    }

    /// Protocol major version.
    #[must_use]
    pub fn proto_major(&self) -> u8 {
        self.proto_numbers().0
    }

    /// Protocol minor version.
    #[must_use]
    pub fn proto_minor(&self) -> u8 {
        self.proto_numbers().1
    }

    fn proto_numbers(&self) -> (u8, u8) {
        match self.version {
            Version::HTTP_09 => (0, 9),
            Version::HTTP_10 => (1, 0),
            Version::HTTP_2 => (2, 0),
            Version::HTTP_3 => (3, 0),
            _ => (1, 1),
        }
    }

    /// Request headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable access to headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// First value of a header, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// All values of a header, skipping values that are not valid UTF-8.
    #[must_use]
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect()
    }

    /// Set a header, replacing all previous values.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or the value is not a valid header.
    pub fn set_header(&mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<()> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Add a header value, keeping previous values.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or the value is not a valid header.
    pub fn append_header(&mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<()> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        self.headers.append(name, value);
        Ok(())
    }

    /// Request body; empty when nothing was set.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Replace the body.
    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
    }

    /// Take the body out, leaving an empty one.
    pub fn take_body(&mut self) -> Bytes {
        std::mem::take(&mut self.body)
    }

    /// Set `Authorization: Basic <base64(user:pass)>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials do not make a valid header value;
    /// the request is left untouched.
    pub fn set_basic_auth(&mut self, username: &str, password: &str) -> Result<()> {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
        self.set_authorization(&format!("Basic {encoded}"))
    }

    /// Credentials of a basic `Authorization` header, if there is a well-formed one.
    #[must_use]
    pub fn basic_auth(&self) -> Option<(String, String)> {
        let encoded = self.header(AUTHORIZATION.as_str())?.strip_prefix("Basic ")?;
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;
        Some((username.to_string(), password.to_string()))
    }

    /// Set `Authorization: Bearer <token>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value; the request
    /// is left untouched.
    pub fn set_bearer_auth(&mut self, token: &str) -> Result<()> {
        self.set_authorization(&format!("Bearer {token}"))
    }

    fn set_authorization(&mut self, value: &str) -> Result<()> {
        let mut value = HeaderValue::from_str(value)
            .map_err(|e| Error::invalid_request(format!("invalid authorization header: {e}")))?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(())
    }

    /// Consume into (method, url, version, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, Option<Url>, Version, HeaderMap, Bytes) {
        (
            self.method,
            self.url,
            self.version,
            self.headers,
            self.body,
        )
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| Error::invalid_request(format!("invalid header name {name:?}: {e}")))?;
    let value = HeaderValue::from_str(value)
        .map_err(|e| Error::invalid_request(format!("invalid value for header {name}: {e}")))?;
    Ok((name, value))
}

/// Builder for constructing [`Request`] instances.
///
/// Errors are deferred until [`RequestBuilder::build`].
#[derive(Debug)]
pub struct RequestBuilder {
    request: Result<Request>,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            request: Ok(Request::new(method, url)),
        }
    }

    fn and_then(mut self, f: impl FnOnce(&mut Request) -> Result<()>) -> Self {
        self.request = self.request.and_then(|mut request| {
            f(&mut request)?;
            Ok(request)
        });
        self
    }

    /// Sets a header.
    #[must_use]
    pub fn header(self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.and_then(|request| request.set_header(name, value))
    }

    /// Appends a query parameter to the URL.
    #[must_use]
    pub fn query(self, name: &str, value: &str) -> Self {
        self.and_then(|request| {
            if let Some(url) = request.url_mut() {
                url.query_pairs_mut().append_pair(name, value);
            }
            Ok(())
        })
    }

    /// Appends the serialized fields of `value` as query parameters.
    #[must_use]
    pub fn query_params<T: serde::Serialize>(self, value: &T) -> Self {
        self.and_then(|request| {
            let query = crate::to_query_string(value)?;
            if let Some(url) = request.url_mut().filter(|_| !query.is_empty()) {
                let merged = match url.query() {
                    Some(existing) if !existing.is_empty() => format!("{existing}&{query}"),
                    _ => query,
                };
                url.set_query(Some(&merged));
            }
            Ok(())
        })
    }

    /// Sets the HTTP protocol version.
    #[must_use]
    pub fn version(self, version: Version) -> Self {
        self.and_then(|request| {
            request.set_version(version);
            Ok(())
        })
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(self, body: impl Into<Bytes>) -> Self {
        self.and_then(|request| {
            request.set_body(body);
            Ok(())
        })
    }

    /// Sets a JSON body and its content type.
    #[must_use]
    pub fn json<T: serde::Serialize>(self, value: &T) -> Self {
        self.typed_body(ContentType::Json, || crate::to_json(value))
    }

    /// Sets a form-urlencoded body and its content type.
    #[must_use]
    pub fn form<T: serde::Serialize>(self, value: &T) -> Self {
        self.typed_body(ContentType::FormUrlEncoded, || crate::to_form(value))
    }

    fn typed_body(self, content_type: ContentType, encode: impl FnOnce() -> Result<Bytes>) -> Self {
        self.and_then(|request| {
            let body = encode()?;
            request
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(content_type.as_str()));
            request.set_body(body);
            Ok(())
        })
    }

    /// Builds the [`Request`].
    ///
    /// # Errors
    ///
    /// Returns the first error met while building.
    pub fn build(self) -> Result<Request> {
        self.request
    }
}

/// Creates a blank request, see [`Request::empty`].
#[must_use]
pub fn empty_request() -> Request {
    Request::empty()
}
