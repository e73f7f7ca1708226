//! Turning HTTP error statuses into failures.

use shallot_core::{Error, Response, ResponseProcessor, Result};

/// Middleware failing responses with a status of 400 or more.
///
/// The failure is an [`ErrorKind::Http`](shallot_core::ErrorKind::Http)
/// carrying the response, so callers can still read its body:
///
/// ```
/// # use shallot_core::{Error, Response, HeaderMap};
/// # let err = Error::http(404, "Not Found").with_response(Response::new(404, HeaderMap::new(), "{}"));
/// if let Some(response) = err.response() {
///     println!("{}: {:?}", response.status_text(), response.text());
/// }
/// ```
///
/// Failures from further down the chain pass through unchanged.
pub fn error_for_status()
-> ResponseProcessor<impl Fn(&Result<Response>) -> Result<()> + Send + Sync + 'static> {
    ResponseProcessor::new(|outcome: &Result<Response>| match outcome {
        Ok(response) if response.status() >= 400 => {
            let message = response
                .text()
                .ok()
                .filter(|text| !text.is_empty())
                .map_or_else(|| response.status_text(), ToString::to_string);
            Err(Error::http(response.status(), message))
        }
        _ => Ok(()),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert2::{check, let_assert};
    use shallot_core::{Context, Handler, Middleware, Request, handler_fn};

    use super::*;

    fn respond(status: u16, body: &'static str) -> Arc<dyn Handler> {
        Arc::new(handler_fn(move |_ctx, _request| {
            Box::pin(async move { Ok(Response::new(status, http::HeaderMap::new(), body)) })
        }))
    }

    #[tokio::test]
    async fn success_passes_through() {
        let handler = error_for_status().exec(respond(200, "ok"));

        let response = handler
            .handle(Context::background(), &mut Request::empty())
            .await
            .unwrap();

        check!(response.status() == 200);
    }

    #[tokio::test]
    async fn client_error_keeps_response() {
        let handler = error_for_status().exec(respond(404, r#"{"error":"missing"}"#));

        let result = handler
            .handle(Context::background(), &mut Request::empty())
            .await;

        let_assert!(Err(err) = result);
        check!(err.status() == Some(404));
        check!(err.is_client_error());
        let_assert!(Some(response) = err.response());
        check!(response.text() == Ok(r#"{"error":"missing"}"#));
    }

    #[tokio::test]
    async fn empty_body_uses_status_text() {
        let handler = error_for_status().exec(respond(503, ""));

        let result = handler
            .handle(Context::background(), &mut Request::empty())
            .await;

        let_assert!(Err(err) = result);
        insta::assert_snapshot!(err, @"HTTP error 503: 503 Service Unavailable");
    }

    #[tokio::test]
    async fn transport_failure_passes_through() {
        let failing = handler_fn(|_ctx, _request| {
            Box::pin(async { Err(Error::connection("connection refused")) })
        });
        let handler = error_for_status().exec(Arc::new(failing));

        let result = handler
            .handle(Context::background(), &mut Request::empty())
            .await;

        let_assert!(Err(err) = result);
        check!(err == Error::connection("connection refused"));
        check!(err.response().is_none());
    }
}
