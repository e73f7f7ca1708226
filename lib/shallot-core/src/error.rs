//! Error types for shallot.
//!
//! A pipeline failure is a single [`Error`] value. It describes what went wrong
//! through its [`ErrorKind`] and may carry the [`Response`] that was produced
//! alongside it, e.g. when a response middleware turns a `404` into an error.

use std::sync::Arc;

use derive_more::{Display, Error};

use crate::Response;

/// Boxed error type accepted by [`Error::custom`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// Error Kind
// ============================================================================

/// What went wrong.
#[derive(Debug, Clone, Display, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// HTTP-level errors (non-2xx status codes turned into errors).
    #[display("HTTP error {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    Tls(#[error(not(source))] String),

    /// The deadline carried by the context (or the client timeout) elapsed.
    #[display("request timeout")]
    Timeout,

    /// The context was cancelled.
    #[display("request canceled")]
    Canceled,

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    InvalidRequest(#[error(not(source))] String),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    InvalidUrl(url::ParseError),

    /// A middleware ended the chain without calling the next handler.
    #[display("chain aborted: {_0}")]
    Aborted(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    JsonSerialization(#[error(not(source))] String),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Form or query string serialization error.
    #[display("form serialization error: {_0}")]
    FormSerialization(#[error(not(source))] String),

    /// Any other failure, typically produced by client middlewares.
    #[display("{_0}")]
    Custom(Arc<dyn std::error::Error + Send + Sync + 'static>),
}

impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Http { status, message },
                Self::Http {
                    status: other_status,
                    message: other_message,
                },
            ) => status == other_status && message == other_message,
            (Self::Connection(a), Self::Connection(b))
            | (Self::Tls(a), Self::Tls(b))
            | (Self::InvalidRequest(a), Self::InvalidRequest(b))
            | (Self::Aborted(a), Self::Aborted(b))
            | (Self::JsonSerialization(a), Self::JsonSerialization(b))
            | (Self::FormSerialization(a), Self::FormSerialization(b)) => a == b,
            (Self::Timeout, Self::Timeout) | (Self::Canceled, Self::Canceled) => true,
            (Self::InvalidUrl(a), Self::InvalidUrl(b)) => a == b,
            (
                Self::JsonDeserialization { path, message },
                Self::JsonDeserialization {
                    path: other_path,
                    message: other_message,
                },
            ) => path == other_path && message == other_message,
            // custom errors are compared by identity
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for shallot operations.
///
/// Two errors are equal when they describe the same failure; an attached
/// response is not part of the comparison.
#[derive(Debug, Clone, Display)]
#[display("{kind}")]
pub struct Error {
    kind: ErrorKind,
    response: Option<Box<Response>>,
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error of the given kind, without response.
    #[must_use]
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            response: None,
        }
    }

    /// Create an HTTP error from status code and message.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Http {
            status,
            message: message.into(),
        })
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Connection(message.into()))
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Tls(message.into()))
    }

    /// Create a timeout error.
    #[must_use]
    pub const fn timeout() -> Self {
        Self::new(ErrorKind::Timeout)
    }

    /// Create a cancellation error.
    #[must_use]
    pub const fn canceled() -> Self {
        Self::new(ErrorKind::Canceled)
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest(message.into()))
    }

    /// Create the error a middleware returns when it does not call the next handler.
    #[must_use]
    pub fn aborted(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Aborted(reason.into()))
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        })
    }

    /// Wrap any error.
    ///
    /// Clones of the returned value compare equal to each other, and only to them.
    #[must_use]
    pub fn custom(error: impl Into<BoxError>) -> Self {
        Self::new(ErrorKind::Custom(Arc::from(error.into())))
    }

    /// What went wrong.
    #[must_use]
    pub const fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Attach the response that was produced alongside this failure.
    #[must_use]
    pub fn with_response(mut self, response: Response) -> Self {
        self.response = Some(Box::new(response));
        self
    }

    /// Replace the attached response, possibly removing it.
    #[must_use]
    pub fn with_response_opt(mut self, response: Option<Response>) -> Self {
        self.response = response.map(Box::new);
        self
    }

    /// Response produced alongside this failure, if any.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        self.response.as_deref()
    }

    /// Take the attached response out of this error.
    pub fn take_response(&mut self) -> Option<Response> {
        self.response.take().map(|response| *response)
    }

    /// Consume into the attached response.
    #[must_use]
    pub fn into_response(self) -> Option<Response> {
        self.response.map(|response| *response)
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout)
    }

    /// Returns `true` if the context was cancelled.
    #[must_use]
    pub const fn is_canceled(&self) -> bool {
        matches!(self.kind, ErrorKind::Canceled)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self.kind, ErrorKind::Connection(_))
    }

    /// Returns `true` if a middleware ended the chain early.
    #[must_use]
    pub const fn is_aborted(&self) -> bool {
        matches!(self.kind, ErrorKind::Aborted(_))
    }

    /// Returns the HTTP status code if this is an HTTP error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::Http { status, .. } => Some(status),
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Try to decode the body of the attached response as JSON.
    ///
    /// Returns `None` when no response is attached.
    pub fn decode_body<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.response()
            .map(|response| crate::from_json(response.body()))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::new(ErrorKind::InvalidUrl(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::new(ErrorKind::JsonSerialization(err.to_string()))
    }
}

impl From<serde_html_form::ser::Error> for Error {
    fn from(err: serde_html_form::ser::Error) -> Self {
        Self::new(ErrorKind::FormSerialization(err.to_string()))
    }
}
