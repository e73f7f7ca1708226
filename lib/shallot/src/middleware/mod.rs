//! Ready-made middlewares for shallot chains.
//!
//! Each one is an ordinary [`Middleware`](shallot_core::Middleware), built on
//! the core adapters where one fits:
//!
//! | Middleware | Adapter | Effect |
//! |------------|---------|--------|
//! | [`set_header`] | `RequestProcessor` | sets a static header |
//! | [`bearer_auth`] | `RequestProcessor` | `Authorization: Bearer <token>` |
//! | [`basic_auth`] | `RequestProcessor` | `Authorization: Basic <base64>` |
//! | [`timeout`] | `ContextProcessor` | deadline for the rest of the chain |
//! | [`error_for_status`] | `ResponseProcessor` | fails responses with status >= 400 |
//! | [`LoggingLayer`] | raw `Middleware` | `tracing` span and events per exchange |
//!
//! Middlewares run in the order they are added: the first one added sees the
//! request first and the response last.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use shallot::middleware::{LoggingLayer, bearer_auth, error_for_status, timeout};
//! use shallot_core::Chain;
//!
//! let mut chain = Chain::default();
//! chain
//!     .use_middleware(LoggingLayer::new())
//!     .use_middleware(error_for_status())
//!     .use_middleware(timeout(Duration::from_secs(5)))
//!     .use_middleware(bearer_auth("my-token"));
//! assert_eq!(chain.len(), 4);
//! ```

use http::HeaderValue;
use shallot_core::{Error, Result};

mod basic_auth;
mod bearer_auth;
mod header;
mod logging;
mod status;
mod timeout;

pub use basic_auth::basic_auth;
pub use bearer_auth::bearer_auth;
pub use header::set_header;
pub use logging::{LogLevel, LoggingLayer};
pub use status::error_for_status;
pub use timeout::timeout;

/// Header value hidden from `Debug` output.
fn sensitive_header_value(value: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(value)
        .map_err(|e| Error::invalid_request(format!("invalid authorization header: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}
