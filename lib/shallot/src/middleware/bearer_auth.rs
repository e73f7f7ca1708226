//! Bearer token authentication middleware.

use http::{HeaderValue, header::AUTHORIZATION};
use shallot_core::{Request, RequestProcessor, Result};

use super::sensitive_header_value;

/// Middleware setting `Authorization: Bearer <token>` on each request.
///
/// A token that cannot be a header value fails every request with
/// [`ErrorKind::InvalidRequest`](shallot_core::ErrorKind::InvalidRequest)
/// before anything is sent.
pub fn bearer_auth(
    token: impl AsRef<str>,
) -> RequestProcessor<impl Fn(&mut Request) -> Result<()> + Send + Sync + 'static> {
    let value: Result<HeaderValue> =
        sensitive_header_value(&format!("Bearer {}", token.as_ref()));

    RequestProcessor::new(move |request: &mut Request| {
        request.headers_mut().insert(AUTHORIZATION, value.clone()?);
        Ok(())
    })
}
