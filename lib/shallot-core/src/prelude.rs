//! Prelude module for convenient imports.
//!
//! ```ignore
//! use shallot_core::prelude::*;
//! ```

pub use crate::{
    BoxHandler, BoxMiddleware, Chain, Context, ContextProcessor, Error, ErrorKind, Handler,
    Method, Middleware, Request, RequestProcessor, Response, ResponseProcessor, Result,
    handler_fn, middleware_fn,
};
