//! Narrow middlewares written as plain functions.
//!
//! - [`RequestProcessor`] touches the request, then continues (or stops with an error).
//! - [`ResponseProcessor`] inspects the outcome, and may replace its error.
//! - [`ContextProcessor`] derives the context used by the rest of the pipeline.

use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::{BoxHandler, Context, Handler, Middleware, Request, Response, Result};

// ============================================================================
// Request Processor
// ============================================================================

/// Middleware running a function on the request before calling next.
///
/// When the function fails, its error is returned as is and the next handler
/// (and everything inside it) is never called.
///
/// # Example
///
/// ```
/// use shallot_core::RequestProcessor;
///
/// let json = RequestProcessor::new(|request| request.set_header("Accept", "application/json"));
/// # let _ = json;
/// ```
pub struct RequestProcessor<F> {
    process: Arc<F>,
}

impl<F> RequestProcessor<F>
where
    F: Fn(&mut Request) -> Result<()> + Send + Sync + 'static,
{
    /// Create a request processor.
    pub fn new(process: F) -> Self {
        Self {
            process: Arc::new(process),
        }
    }
}

impl<F> Clone for RequestProcessor<F> {
    fn clone(&self) -> Self {
        Self {
            process: Arc::clone(&self.process),
        }
    }
}

impl<F> fmt::Debug for RequestProcessor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestProcessor").finish_non_exhaustive()
    }
}

impl<F> Middleware for RequestProcessor<F>
where
    F: Fn(&mut Request) -> Result<()> + Send + Sync + 'static,
{
    fn exec(&self, next: BoxHandler) -> BoxHandler {
        Arc::new(ProcessRequest {
            process: Arc::clone(&self.process),
            next,
        })
    }
}

struct ProcessRequest<F> {
    process: Arc<F>,
    next: BoxHandler,
}

impl<F> Handler for ProcessRequest<F>
where
    F: Fn(&mut Request) -> Result<()> + Send + Sync,
{
    fn handle<'a>(
        &'a self,
        ctx: Context,
        request: &'a mut Request,
    ) -> BoxFuture<'a, Result<Response>> {
        Box::pin(async move {
            (self.process)(request)?;
            self.next.handle(ctx, request).await
        })
    }
}

// ============================================================================
// Response Processor
// ============================================================================

/// Middleware observing the outcome of the next handler.
///
/// The next handler is always called, and the function always sees its
/// outcome, failures included. Returning `Ok(())` passes the outcome through
/// unchanged. Returning an error replaces the outcome's error (or turns a
/// success into a failure); the response produced by next stays attached to
/// that error, and no other response is ever attached.
///
/// # Example
///
/// ```
/// use shallot_core::{Error, ResponseProcessor};
///
/// let not_found = ResponseProcessor::new(|outcome| match outcome {
///     Ok(response) if response.status() == 404 => Err(Error::http(404, "missing")),
///     _ => Ok(()),
/// });
/// # let _ = not_found;
/// ```
pub struct ResponseProcessor<F> {
    process: Arc<F>,
}

impl<F> ResponseProcessor<F>
where
    F: Fn(&Result<Response>) -> Result<()> + Send + Sync + 'static,
{
    /// Create a response processor.
    pub fn new(process: F) -> Self {
        Self {
            process: Arc::new(process),
        }
    }
}

impl<F> Clone for ResponseProcessor<F> {
    fn clone(&self) -> Self {
        Self {
            process: Arc::clone(&self.process),
        }
    }
}

impl<F> fmt::Debug for ResponseProcessor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseProcessor").finish_non_exhaustive()
    }
}

impl<F> Middleware for ResponseProcessor<F>
where
    F: Fn(&Result<Response>) -> Result<()> + Send + Sync + 'static,
{
    fn exec(&self, next: BoxHandler) -> BoxHandler {
        Arc::new(ProcessResponse {
            process: Arc::clone(&self.process),
            next,
        })
    }
}

struct ProcessResponse<F> {
    process: Arc<F>,
    next: BoxHandler,
}

impl<F> Handler for ProcessResponse<F>
where
    F: Fn(&Result<Response>) -> Result<()> + Send + Sync,
{
    fn handle<'a>(
        &'a self,
        ctx: Context,
        request: &'a mut Request,
    ) -> BoxFuture<'a, Result<Response>> {
        Box::pin(async move {
            let outcome = self.next.handle(ctx, request).await;
            let Err(replacement) = (self.process)(&outcome) else {
                return outcome;
            };
            let response = match outcome {
                Ok(response) => Some(response),
                Err(upstream) => upstream.into_response(),
            };
            Err(replacement.with_response_opt(response))
        })
    }
}

// ============================================================================
// Context Processor
// ============================================================================

/// Middleware deriving the context handed to the next handler.
///
/// It cannot fail; use a [`RequestProcessor`] or a full [`Middleware`] when
/// deriving the context may go wrong.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use shallot_core::ContextProcessor;
///
/// let five_seconds = ContextProcessor::new(|ctx| ctx.with_timeout(Duration::from_secs(5)));
/// # let _ = five_seconds;
/// ```
pub struct ContextProcessor<F> {
    process: Arc<F>,
}

impl<F> ContextProcessor<F>
where
    F: Fn(&Context) -> Context + Send + Sync + 'static,
{
    /// Create a context processor.
    pub fn new(process: F) -> Self {
        Self {
            process: Arc::new(process),
        }
    }
}

impl<F> Clone for ContextProcessor<F> {
    fn clone(&self) -> Self {
        Self {
            process: Arc::clone(&self.process),
        }
    }
}

impl<F> fmt::Debug for ContextProcessor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextProcessor").finish_non_exhaustive()
    }
}

impl<F> Middleware for ContextProcessor<F>
where
    F: Fn(&Context) -> Context + Send + Sync + 'static,
{
    fn exec(&self, next: BoxHandler) -> BoxHandler {
        Arc::new(ProcessContext {
            process: Arc::clone(&self.process),
            next,
        })
    }
}

struct ProcessContext<F> {
    process: Arc<F>,
    next: BoxHandler,
}

impl<F> Handler for ProcessContext<F>
where
    F: Fn(&Context) -> Context + Send + Sync,
{
    fn handle<'a>(
        &'a self,
        ctx: Context,
        request: &'a mut Request,
    ) -> BoxFuture<'a, Result<Response>> {
        let ctx = (self.process)(&ctx);
        self.next.handle(ctx, request)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert2::{check, let_assert};
    use http::HeaderMap;

    use super::*;
    use crate::{Error, handler_fn};

    /// Terminal handler counting its calls and answering with `status`.
    fn terminal(status: u16) -> (BoxHandler, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handler = handler_fn(move |_ctx, _request| {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move { Ok(Response::new(status, HeaderMap::new(), "body")) })
        });
        (Arc::new(handler), calls)
    }

    fn failing_terminal(error: Error) -> BoxHandler {
        Arc::new(handler_fn(move |_ctx, _request| {
            let error = error.clone();
            Box::pin(async move { Err(error) })
        }))
    }

    #[tokio::test]
    async fn request_processor_mutates_then_continues() {
        let (next, calls) = terminal(200);
        let handler = RequestProcessor::new(|request: &mut Request| {
            request.set_basic_auth("user", "pass")
        })
        .exec(next);

        let mut request = Request::empty();
        let response = handler
            .handle(Context::background(), &mut request)
            .await
            .expect("response");

        check!(response.status() == 200);
        check!(calls.load(Ordering::SeqCst) == 1);
        check!(request.basic_auth() == Some(("user".to_string(), "pass".to_string())));
    }

    #[tokio::test]
    async fn request_processor_error_short_circuits() {
        let (next, calls) = terminal(200);
        let fixed = Error::custom("custom error");
        let expected = fixed.clone();
        let handler = RequestProcessor::new(move |_request: &mut Request| Err(fixed.clone()))
            .exec(next);

        let result = handler
            .handle(Context::background(), &mut Request::empty())
            .await;

        let_assert!(Err(err) = result);
        check!(err == expected);
        check!(err.response().is_none());
        check!(calls.load(Ordering::SeqCst) == 0);
    }

    #[tokio::test]
    async fn response_processor_passes_success_through() {
        let (next, calls) = terminal(200);
        let seen = Arc::new(AtomicUsize::new(0));
        let observer = Arc::clone(&seen);
        let handler = ResponseProcessor::new(move |outcome: &Result<Response>| {
            if outcome.is_ok() {
                observer.fetch_add(1, Ordering::SeqCst);
            }
            Ok(())
        })
        .exec(next);

        let response = handler
            .handle(Context::background(), &mut Request::empty())
            .await
            .expect("response");

        check!(response.body().as_ref() == b"body");
        check!(calls.load(Ordering::SeqCst) == 1);
        check!(seen.load(Ordering::SeqCst) == 1);
    }

    #[tokio::test]
    async fn response_processor_passes_failure_through() {
        let upstream = Error::connection("refused");
        let handler = ResponseProcessor::new(|outcome: &Result<Response>| {
            assert!(outcome.is_err());
            Ok(())
        })
        .exec(failing_terminal(upstream.clone()));

        let result = handler
            .handle(Context::background(), &mut Request::empty())
            .await;

        let_assert!(Err(err) = result);
        check!(err == upstream);
    }

    #[tokio::test]
    async fn response_processor_replaces_error_and_keeps_response() {
        let (next, calls) = terminal(404);
        let handler = ResponseProcessor::new(|outcome: &Result<Response>| match outcome {
            Ok(response) if response.is_client_error() => {
                Err(Error::http(response.status(), "client error"))
            }
            _ => Ok(()),
        })
        .exec(next);

        let result = handler
            .handle(Context::background(), &mut Request::empty())
            .await;

        check!(calls.load(Ordering::SeqCst) == 1);
        let_assert!(Err(err) = result);
        check!(err.status() == Some(404));
        let_assert!(Some(response) = err.response());
        check!(response.body().as_ref() == b"body");
    }

    #[tokio::test]
    async fn response_processor_replaces_upstream_error() {
        let upstream_response = Response::new(502, HeaderMap::new(), "gateway");
        let upstream = Error::http(502, "bad gateway").with_response(upstream_response);
        let replacement = Error::custom("mapped");
        let expected = replacement.clone();
        let handler = ResponseProcessor::new(move |_outcome: &Result<Response>| {
            Err(replacement.clone())
        })
        .exec(failing_terminal(upstream));

        let result = handler
            .handle(Context::background(), &mut Request::empty())
            .await;

        let_assert!(Err(err) = result);
        check!(err == expected);
        let_assert!(Some(response) = err.response());
        check!(response.status() == 502);
    }

    #[tokio::test]
    async fn response_processor_never_fabricates_a_response() {
        let handler = ResponseProcessor::new(|_outcome: &Result<Response>| {
            Err(Error::aborted("replaced")
                .with_response(Response::new(200, HeaderMap::new(), "forged")))
        })
        .exec(failing_terminal(Error::timeout()));

        let result = handler
            .handle(Context::background(), &mut Request::empty())
            .await;

        let_assert!(Err(err) = result);
        check!(err.is_aborted());
        check!(err.response().is_none());
    }

    #[derive(Debug, Clone, PartialEq)]
    struct RequestId(u32);

    #[tokio::test]
    async fn context_processor_substitutes_context() {
        let next: BoxHandler = Arc::new(handler_fn(|ctx, _request| {
            let id = ctx.value::<RequestId>().map_or(0, |id| id.0);
            Box::pin(async move { Ok(Response::new(200, HeaderMap::new(), id.to_string())) })
        }));
        let handler = ContextProcessor::new(|ctx: &Context| ctx.with_value(RequestId(7))).exec(next);

        let root = Context::background();
        let response = handler
            .handle(root.clone(), &mut Request::empty())
            .await
            .expect("response");

        check!(response.text() == Ok("7"));
        check!(root.value::<RequestId>().is_none());
    }
}
