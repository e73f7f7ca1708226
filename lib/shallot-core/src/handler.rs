//! The [`Handler`] capability and its functional adapter.

use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::{Context, Request, Response, Result};

/// A unit of work turning a request into a response.
///
/// The terminal handler of a pipeline performs the actual I/O and SHOULD bind
/// it to `ctx` (cancellation and deadline). Intermediate handlers, produced by
/// [`Middleware::exec`](crate::Middleware::exec), do their own work around a
/// call to the next handler.
///
/// The request is lent mutably for the duration of the call: the caller keeps
/// ownership and observes whatever the pipeline changed.
pub trait Handler: Send + Sync {
    /// Handle one request.
    fn handle<'a>(&'a self, ctx: Context, request: &'a mut Request)
    -> BoxFuture<'a, Result<Response>>;
}

/// Shared, type-erased handler.
pub type BoxHandler = Arc<dyn Handler>;

impl<H> Handler for Arc<H>
where
    H: Handler + ?Sized,
{
    fn handle<'a>(
        &'a self,
        ctx: Context,
        request: &'a mut Request,
    ) -> BoxFuture<'a, Result<Response>> {
        (**self).handle(ctx, request)
    }
}

/// Adapter making a closure usable as a [`Handler`].
///
/// Build one with [`handler_fn`].
#[derive(Clone, Copy)]
pub struct HandlerFunc<F> {
    f: F,
}

impl<F> std::fmt::Debug for HandlerFunc<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerFunc").finish_non_exhaustive()
    }
}

impl<F> Handler for HandlerFunc<F>
where
    F: for<'a> Fn(Context, &'a mut Request) -> BoxFuture<'a, Result<Response>> + Send + Sync,
{
    fn handle<'a>(
        &'a self,
        ctx: Context,
        request: &'a mut Request,
    ) -> BoxFuture<'a, Result<Response>> {
        (self.f)(ctx, request)
    }
}

/// Wrap a closure into a [`Handler`].
///
/// # Example
///
/// ```
/// use http::HeaderMap;
/// use shallot_core::{Handler, Response, handler_fn};
///
/// let ok = handler_fn(|_ctx, _request| {
///     Box::pin(async { Ok(Response::new(204, HeaderMap::new(), "")) })
/// });
/// # let _ = ok;
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFunc<F>
where
    F: for<'a> Fn(Context, &'a mut Request) -> BoxFuture<'a, Result<Response>> + Send + Sync,
{
    HandlerFunc { f }
}
