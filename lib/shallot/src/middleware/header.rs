//! Static header middleware.

use http::{HeaderName, HeaderValue};
use shallot_core::{Error, Request, RequestProcessor, Result};

/// Middleware setting a header on each request, replacing previous values.
///
/// The name and value are validated once; when invalid, every request fails
/// with [`ErrorKind::InvalidRequest`](shallot_core::ErrorKind::InvalidRequest).
///
/// # Example
///
/// ```
/// use shallot::middleware::set_header;
/// use shallot_core::Chain;
///
/// let mut chain = Chain::default();
/// chain
///     .use_middleware(set_header("X-Client", "shallot"))
///     .use_middleware(set_header("Accept", "application/json"));
/// ```
pub fn set_header(
    name: impl AsRef<str>,
    value: impl AsRef<str>,
) -> RequestProcessor<impl Fn(&mut Request) -> Result<()> + Send + Sync + 'static> {
    let header = parse(name.as_ref(), value.as_ref());

    RequestProcessor::new(move |request: &mut Request| {
        let (name, value) = header.clone()?;
        request.headers_mut().insert(name, value);
        Ok(())
    })
}

fn parse(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let name = HeaderName::try_from(name)
        .map_err(|e| Error::invalid_request(format!("invalid header name '{name}': {e}")))?;
    let value = HeaderValue::try_from(value)
        .map_err(|e| Error::invalid_request(format!("invalid value for header '{name}': {e}")))?;
    Ok((name, value))
}
