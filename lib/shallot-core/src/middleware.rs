//! The [`Middleware`] capability and its functional adapter.

use std::sync::Arc;

use crate::BoxHandler;

/// A transformation wrapping the next [`Handler`](crate::Handler) into a new one.
///
/// The returned handler SHOULD call `next` somewhere to keep the chain
/// unbroken. It MAY decide not to (authorization missing, circuit open, ...),
/// but then it MUST return an error, typically [`Error::aborted`](crate::Error::aborted),
/// so that callers can tell the chain was ended on purpose.
///
/// `exec` only composes; it does not run anything. Any state a middleware
/// needs is captured when the middleware is built.
pub trait Middleware: Send + Sync {
    /// Wrap `next`.
    fn exec(&self, next: BoxHandler) -> BoxHandler;
}

/// Shared, type-erased middleware.
pub type BoxMiddleware = Arc<dyn Middleware>;

impl<M> Middleware for Arc<M>
where
    M: Middleware + ?Sized,
{
    fn exec(&self, next: BoxHandler) -> BoxHandler {
        (**self).exec(next)
    }
}

/// Adapter making a closure usable as a [`Middleware`].
///
/// Build one with [`middleware_fn`].
#[derive(Clone, Copy)]
pub struct MiddlewareFunc<F> {
    f: F,
}

impl<F> std::fmt::Debug for MiddlewareFunc<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareFunc").finish_non_exhaustive()
    }
}

impl<F> Middleware for MiddlewareFunc<F>
where
    F: Fn(BoxHandler) -> BoxHandler + Send + Sync,
{
    fn exec(&self, next: BoxHandler) -> BoxHandler {
        (self.f)(next)
    }
}

/// Wrap a closure into a [`Middleware`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use shallot_core::{BoxHandler, Handler, handler_fn, middleware_fn};
///
/// let trace = middleware_fn(|next: BoxHandler| -> BoxHandler {
///     Arc::new(handler_fn(move |ctx, request| {
///         let next = Arc::clone(&next);
///         Box::pin(async move {
///             request.set_header("X-Traced", "1")?;
///             next.handle(ctx, request).await
///         })
///     }))
/// });
/// # let _ = trace;
/// ```
pub fn middleware_fn<F>(f: F) -> MiddlewareFunc<F>
where
    F: Fn(BoxHandler) -> BoxHandler + Send + Sync,
{
    MiddlewareFunc { f }
}
