//! Prelude module for convenient imports.
//!
//! ```ignore
//! use shallot::prelude::*;
//! ```

pub use crate::{
    BoxHandler, BoxMiddleware, Chain, Client, ClientConfig, Context, Error, Handler, HyperClient,
    Method, Middleware, Request, Response, Result, StatusCode, handler_fn, middleware_fn,
};
