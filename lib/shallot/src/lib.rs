//! Composable middleware chains for async HTTP clients.
//!
//! Build a pipeline of small middlewares (auth, logging, deadlines, ...) in
//! front of a hyper-based transport, and share it across requests.
//!
//! # Example
//!
//! ```no_run
//! use shallot::prelude::*;
//!
//! # async fn run() -> shallot::Result<()> {
//! let client = Client::builder()
//!     .with_logging()
//!     .with_error_for_status()
//!     .build();
//!
//! let mut request = Request::new(Method::Get, "https://api.example.com/users/42".parse()?);
//! let response = client.send(Context::background(), &mut request).await?;
//! println!("{}", response.status_text());
//! # Ok(())
//! # }
//! ```
//!
//! See the [tutorial][_tutorial] for a complete guide.

pub mod _tutorial;
mod client;
mod config;
mod connector;
mod context;
pub mod middleware;
pub mod prelude;
mod transport;

pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_USER_AGENT};
pub use context::{get_client, set_client};
pub use transport::{ContextTransport, HyperClient};

// Re-export core types
pub use shallot_core::{
    BoxFuture, BoxHandler, BoxMiddleware, CancellationToken, Chain, ContentType, Context,
    ContextProcessor, Error, ErrorKind, Handler, HandlerFunc, Method, Middleware, MiddlewareFunc,
    Request, RequestBuilder, RequestProcessor, Response, ResponseProcessor, Result, empty_request,
    from_json, handler_fn, middleware_fn, to_form, to_json, to_query_string,
};

// Re-export http types for status codes and headers
pub use shallot_core::{HeaderMap, StatusCode, Version, header};

pub use url;
