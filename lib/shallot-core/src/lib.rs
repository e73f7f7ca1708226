//! Core types and traits for shallot HTTP client pipelines.
//!
//! A pipeline is an onion of small, independent units wrapped around a
//! terminal handler that performs the actual I/O:
//!
//! - [`Handler`] - turns a [`Request`] into a [`Response`], given a [`Context`]
//! - [`Middleware`] - wraps a handler into a new handler
//! - [`RequestProcessor`], [`ResponseProcessor`], [`ContextProcessor`] -
//!   middlewares written as plain functions touching only one thing
//! - [`Chain`] - an ordered list of middlewares, itself a middleware, with
//!   optional parent delegation
//!
//! This crate performs no I/O: the terminal handler and the concrete
//! middlewares (auth, logging, ...) are client code built on these contracts.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use http::HeaderMap;
//! use shallot_core::{BoxHandler, Chain, Context, Handler, Middleware, Request, Response, handler_fn};
//!
//! # tokio_test_main(async {
//! let mut chain = Chain::default();
//! chain.use_request(|request| request.set_header("X-Api-Key", "secret"));
//!
//! let echo: BoxHandler = Arc::new(handler_fn(|_ctx, request| {
//!     let key = request.header("x-api-key").unwrap_or_default().to_string();
//!     Box::pin(async move { Ok(Response::new(200, HeaderMap::new(), key)) })
//! }));
//!
//! let handler = chain.exec(echo);
//! let response = handler.handle(Context::background(), &mut Request::empty()).await?;
//! assert_eq!(response.text(), Ok("secret"));
//! # Ok::<_, shallot_core::Error>(())
//! # });
//! # fn tokio_test_main<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

mod body;
mod chain;
mod context;
mod error;
mod handler;
mod method;
mod middleware;
pub mod prelude;
mod processor;
mod request;
mod response;

pub use body::{ContentType, from_json, to_form, to_json, to_query_string};
pub use chain::Chain;
pub use context::Context;
pub use error::{BoxError, Error, ErrorKind, Result};
pub use handler::{BoxHandler, Handler, HandlerFunc, handler_fn};
pub use method::Method;
pub use middleware::{BoxMiddleware, Middleware, MiddlewareFunc, middleware_fn};
pub use processor::{ContextProcessor, RequestProcessor, ResponseProcessor};
pub use request::{Request, RequestBuilder, empty_request};
pub use response::Response;

// Re-export http crate types for status codes and headers
pub use http::{HeaderMap, StatusCode, Version, header};

// Re-export the cancellation handle returned by `Context::with_cancel`
pub use tokio_util::sync::CancellationToken;

// Re-export the future type of `Handler::handle`
pub use futures_util::future::BoxFuture;
