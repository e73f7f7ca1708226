//! Deadline middleware.

use std::time::Duration;

use shallot_core::{Context, ContextProcessor};

/// Middleware bounding everything after it by `timeout`.
///
/// The deadline starts when the request reaches this middleware. A stricter
/// deadline already carried by the context is kept.
pub fn timeout(
    timeout: Duration,
) -> ContextProcessor<impl Fn(&Context) -> Context + Send + Sync + 'static> {
    ContextProcessor::new(move |ctx: &Context| ctx.with_timeout(timeout))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert2::{check, let_assert};
    use shallot_core::{Handler, Middleware, Request, Response, handler_fn};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn slow_handler_times_out() {
        let slow = handler_fn(|ctx, _request| {
            Box::pin(async move {
                ctx.run(tokio::time::sleep(Duration::from_secs(10)))
                    .await
                    .map(|()| Response::new(200, http::HeaderMap::new(), ""))
            })
        });
        let handler = timeout(Duration::from_millis(100)).exec(Arc::new(slow));

        let result = handler
            .handle(Context::background(), &mut Request::empty())
            .await;

        let_assert!(Err(err) = result);
        check!(err.is_timeout());
    }

    #[tokio::test]
    async fn keeps_stricter_deadline() {
        let observe = handler_fn(|ctx, _request| {
            let remaining = ctx.remaining().unwrap_or_default();
            Box::pin(async move {
                Ok(Response::new(200, http::HeaderMap::new(), format!("{}", remaining.as_secs())))
            })
        });
        let handler = timeout(Duration::from_secs(60)).exec(Arc::new(observe));

        let ctx = Context::background().with_timeout(Duration::from_secs(5));
        let response = handler.handle(ctx, &mut Request::empty()).await.unwrap();

        let secs: u64 = response.text().unwrap().parse().unwrap();
        check!(secs <= 5);
    }

    #[tokio::test]
    async fn unbounded_timeout_lets_the_request_through() {
        let observe = handler_fn(|ctx, _request| {
            let bounded = ctx.deadline().is_some();
            Box::pin(async move {
                Ok(Response::new(200, http::HeaderMap::new(), format!("{bounded}")))
            })
        });
        let handler = timeout(Duration::MAX).exec(Arc::new(observe));

        let response = handler
            .handle(Context::background(), &mut Request::empty())
            .await
            .unwrap();

        check!(response.text() == Ok("false"));
    }
}
