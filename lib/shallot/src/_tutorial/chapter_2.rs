//! # Chapter 2: The Client
//!
//! [`Client`](crate::Client) bundles a base chain with a
//! [`HyperClient`](crate::HyperClient):
//!
//! ```ignore
//! use std::time::Duration;
//!
//! use shallot::prelude::*;
//!
//! let client = Client::builder()
//!     .with_logging()
//!     .with_error_for_status()
//!     .with_timeout(Duration::from_secs(10))
//!     .with_bearer_auth("my-token")
//!     .build();
//!
//! let mut request = Request::builder(Method::Get, "https://api.example.com/users".parse()?)
//!     .query("page", "2")
//!     .build()?;
//! let response = client.send(Context::background(), &mut request).await?;
//! let users: Vec<User> = response.json()?;
//! ```
//!
//! ## Per-request Middlewares
//!
//! ```ignore
//! let trace: BoxMiddleware = Arc::new(set_header("X-Trace", "abc"));
//! let response = client.send_with(ctx, &mut request, [trace]).await?;
//! ```
//!
//! ## Cancellation and Deadlines
//!
//! The [`Context`](crate::Context) passed to `send` bounds the whole exchange:
//!
//! ```ignore
//! let (ctx, token) = Context::background().with_cancel();
//! let ctx = ctx.with_timeout(Duration::from_secs(2));
//! // token.cancel() from another task stops the request with `Error::canceled`
//! ```
//!
//! ## Errors
//!
//! With `with_error_for_status`, HTTP errors keep the response:
//!
//! ```ignore
//! match client.send(ctx, &mut request).await {
//!     Ok(response) => { /* 2xx or 3xx */ }
//!     Err(err) if err.is_client_error() => {
//!         let details = err.response().map(|r| r.text());
//!     }
//!     Err(err) => return Err(err),
//! }
//! ```
