//! Basic authentication middleware.
//!
//! Adds an `Authorization: Basic <base64(user:pass)>` header to every request
//! going through the chain.

use base64::Engine;
use http::{HeaderValue, header::AUTHORIZATION};
use shallot_core::{Request, RequestProcessor, Result};

use super::sensitive_header_value;

/// Middleware setting basic credentials on each request.
///
/// The credentials are encoded once, when the middleware is built. Any
/// `Authorization` header already present is replaced.
///
/// # Example
///
/// ```
/// use shallot::middleware::basic_auth;
/// use shallot_core::Chain;
///
/// let mut chain = Chain::default();
/// chain.use_middleware(basic_auth("username", "password"));
/// ```
pub fn basic_auth(
    username: impl AsRef<str>,
    password: impl AsRef<str>,
) -> RequestProcessor<impl Fn(&mut Request) -> Result<()> + Send + Sync + 'static> {
    let credentials = format!("{}:{}", username.as_ref(), password.as_ref());
    let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
    let value: Result<HeaderValue> = sensitive_header_value(&format!("Basic {encoded}"));

    RequestProcessor::new(move |request: &mut Request| {
        request.headers_mut().insert(AUTHORIZATION, value.clone()?);
        Ok(())
    })
}
