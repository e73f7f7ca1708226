//! Body encoding helpers shared by requests and responses.

use bytes::Bytes;
use derive_more::Display;

use crate::{Error, Result};

/// Content type of an encoded body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ContentType {
    /// `application/json`
    #[display("application/json")]
    Json,
    /// `application/x-www-form-urlencoded`
    #[display("application/x-www-form-urlencoded")]
    FormUrlEncoded,
    /// `text/plain`
    #[display("text/plain")]
    PlainText,
    /// `application/octet-stream`
    #[display("application/octet-stream")]
    OctetStream,
}

impl ContentType {
    /// MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
            Self::PlainText => "text/plain",
            Self::OctetStream => "application/octet-stream",
        }
    }
}

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(value)?))
}

/// Serialize a value to form URL-encoded bytes.
///
/// `Vec<T>` fields become repeated fields (`tags=a&tags=b`).
///
/// # Errors
///
/// Returns an error if form serialization fails.
pub fn to_form<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    to_query_string(value).map(Bytes::from)
}

/// Serialize a value to a query string, without leading `?`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_query_string<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_html_form::to_string(value)?)
}

/// Deserialize JSON bytes, reporting the path of the offending field on failure.
///
/// # Errors
///
/// Returns [`crate::ErrorKind::JsonDeserialization`] when the input does not match `T`.
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| Error::json_deserialization(e.path().to_string(), e.inner().to_string()))
}
