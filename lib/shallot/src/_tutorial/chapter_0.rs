//! # Chapter 0: Handlers & Middlewares
//!
//! ## What You'll Learn
//!
//! - What a [`Handler`](crate::Handler) is
//! - How a [`Middleware`](crate::Middleware) wraps one
//! - The three processor shortcuts
//!
//! ## Prerequisites
//!
//! Add to `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! shallot = "0.1"
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! ## Handlers
//!
//! A handler turns a request into a response. The one at the end of a
//! pipeline does the network I/O; [`HyperClient`](crate::HyperClient) is such a
//! handler. Any closure of the right shape works too:
//!
//! ```ignore
//! use shallot::{HeaderMap, Response, handler_fn};
//!
//! let always_ok = handler_fn(|_ctx, _request| {
//!     Box::pin(async { Ok(Response::new(200, HeaderMap::new(), "ok")) })
//! });
//! ```
//!
//! ## Middlewares
//!
//! A middleware receives the next handler and returns a new one. The new
//! handler usually does something, calls next, and does something with the
//! outcome:
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use shallot::{BoxHandler, Handler, handler_fn, middleware_fn};
//!
//! let stamp = middleware_fn(|next: BoxHandler| -> BoxHandler {
//!     Arc::new(handler_fn(move |ctx, request| {
//!         let next = Arc::clone(&next);
//!         Box::pin(async move {
//!             request.set_header("X-Stamp", "1")?;
//!             next.handle(ctx, request).await
//!         })
//!     }))
//! });
//! ```
//!
//! A middleware may decide not to call next. It must then fail, usually with
//! [`Error::aborted`](crate::Error::aborted), so callers can tell why nothing
//! was sent.
//!
//! ## Processors
//!
//! Most middlewares only touch one thing. The processors let you write just
//! that part:
//!
//! | Processor | Sees | Can |
//! |-----------|------|-----|
//! | [`RequestProcessor`](crate::RequestProcessor) | `&mut Request` | modify it, or fail before sending |
//! | [`ResponseProcessor`](crate::ResponseProcessor) | `&Result<Response>` | replace the error |
//! | [`ContextProcessor`](crate::ContextProcessor) | `&Context` | derive a new context |
//!
//! ## Next Steps
//!
//! Continue to [Chapter 1: Chains](super::chapter_1).
