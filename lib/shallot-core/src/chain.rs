//! Ordered middleware collections.
//!
//! A [`Chain`] is itself a [`Middleware`]. Its middlewares wrap the next
//! handler in registration order: the first registered middleware is the
//! outermost one, it sees the request first and the outcome last.
//!
//! ```text
//!   parent middlewares (outermost)
//!     └─ m1
//!         └─ m2
//!             └─ ...
//!                 └─ terminal handler
//! ```
//!
//! A child chain (see [`Chain::child_chain`]) runs its own middlewares inside
//! the ones of its parent, so a per-request chain can observe or override
//! things closer to the terminal handler while the shared base chain keeps
//! the outermost control.

use std::fmt;
use std::sync::Arc;

use crate::{
    BoxHandler, BoxMiddleware, Context, ContextProcessor, Middleware, Request, RequestProcessor,
    Response, ResponseProcessor, Result, middleware_fn,
};

/// Ordered, append-only list of middlewares with an optional parent.
///
/// Mutating a chain needs `&mut`, so a chain cannot grow while it is being
/// composed. Share a finished chain behind an [`Arc`] and branch from it with
/// [`Chain::child_chain`] or [`Chain::copy`].
///
/// `Chain` does not implement `Clone`: [`Chain::copy`] is the explicit,
/// parentless copy.
#[derive(Default)]
pub struct Chain {
    middlewares: Vec<BoxMiddleware>,
    parent: Option<BoxMiddleware>,
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("middlewares_count", &self.middlewares.len())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

impl Chain {
    /// Create a parentless chain with the given middlewares.
    #[must_use]
    pub fn new(middlewares: impl IntoIterator<Item = BoxMiddleware>) -> Self {
        Self {
            middlewares: middlewares.into_iter().collect(),
            parent: None,
        }
    }

    /// Create a chain whose parent is `self`.
    ///
    /// The parent is shared, never mutated. Composing the child runs its own
    /// `middlewares` inside the ones of the parent.
    #[must_use]
    pub fn child_chain(self: &Arc<Self>, middlewares: impl IntoIterator<Item = BoxMiddleware>) -> Self {
        let parent: BoxMiddleware = Arc::clone(self) as BoxMiddleware;
        Self {
            middlewares: middlewares.into_iter().collect(),
            parent: Some(parent),
        }
    }

    /// Parentless chain holding the same middlewares.
    ///
    /// Middlewares are shared, not cloned; adding middlewares to the copy does
    /// not affect `self`.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self {
            middlewares: self.middlewares.clone(),
            parent: None,
        }
    }

    /// Own middlewares, in registration order. Parent middlewares are not included.
    #[must_use]
    pub fn middlewares(&self) -> &[BoxMiddleware] {
        &self.middlewares
    }

    /// Parent of this chain, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&BoxMiddleware> {
        self.parent.as_ref()
    }

    /// Number of own middlewares.
    #[must_use]
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Returns `true` if the chain has no own middleware.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Append a middleware.
    pub fn use_middleware(&mut self, middleware: impl Middleware + 'static) -> &mut Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Append already shared middlewares, in order.
    pub fn use_all(&mut self, middlewares: impl IntoIterator<Item = BoxMiddleware>) -> &mut Self {
        self.middlewares.extend(middlewares);
        self
    }

    /// Append a closure wrapping the next handler.
    pub fn use_fn<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(BoxHandler) -> BoxHandler + Send + Sync + 'static,
    {
        self.use_middleware(middleware_fn(f))
    }

    /// Append a [`RequestProcessor`].
    pub fn use_request<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&mut Request) -> Result<()> + Send + Sync + 'static,
    {
        self.use_middleware(RequestProcessor::new(f))
    }

    /// Append a [`ResponseProcessor`].
    pub fn use_response<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&Result<Response>) -> Result<()> + Send + Sync + 'static,
    {
        self.use_middleware(ResponseProcessor::new(f))
    }

    /// Append a [`ContextProcessor`].
    pub fn use_context<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&Context) -> Context + Send + Sync + 'static,
    {
        self.use_middleware(ContextProcessor::new(f))
    }
}

impl FromIterator<BoxMiddleware> for Chain {
    fn from_iter<I: IntoIterator<Item = BoxMiddleware>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl Middleware for Chain {
    /// Compose the chain around `next` without running anything.
    ///
    /// Own middlewares are applied from the last registered to the first, so
    /// the first one ends up outermost; the parent then wraps the result.
    fn exec(&self, next: BoxHandler) -> BoxHandler {
        let handler = self
            .middlewares
            .iter()
            .rev()
            .fold(next, |handler, middleware| middleware.exec(handler));

        match &self.parent {
            Some(parent) => parent.exec(handler),
            None => handler,
        }
    }
}
