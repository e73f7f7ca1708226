//! Echo Chain Example
//!
//! Builds a middleware chain and runs it twice: once against an in-process
//! echo handler, once against a real server when a URL is given.
//!
//! ```text
//! RUST_LOG=debug cargo run -p echo-chain -- https://httpbin.org/get
//! ```

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use shallot::middleware::{LoggingLayer, set_header};
use shallot::prelude::*;
use shallot::{HeaderMap, url::Url};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// A hand-written middleware
// ============================================================================

/// Numbers outgoing requests with an `X-Request-Id` header.
#[derive(Debug, Default)]
struct RequestId {
    next_id: Arc<AtomicU64>,
}

impl Middleware for RequestId {
    fn exec(&self, next: BoxHandler) -> BoxHandler {
        let counter = Arc::clone(&self.next_id);
        Arc::new(handler_fn(move |ctx, request| {
            let id = counter.fetch_add(1, Ordering::Relaxed) + 1;
            let next = Arc::clone(&next);
            Box::pin(async move {
                request.set_header("X-Request-Id", id.to_string())?;
                next.handle(ctx, request).await
            })
        }))
    }
}

/// Terminal handler answering with the request headers as JSON.
fn echo() -> BoxHandler {
    Arc::new(handler_fn(|_ctx, request| {
        let headers: serde_json::Map<String, serde_json::Value> = request
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                let value = value.to_str().ok()?;
                Some((name.to_string(), value.into()))
            })
            .collect();
        let body = serde_json::Value::Object(headers).to_string();
        Box::pin(async move { Ok(Response::new(200, HeaderMap::new(), body)) })
    }))
}

fn base_chain() -> Chain {
    let mut chain = Chain::default();
    chain
        .use_middleware(LoggingLayer::new())
        .use_middleware(RequestId::default())
        .use_middleware(set_header("Accept", "application/json"));
    chain
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> shallot::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // In-process: the chain in front of the echo handler
    let base = Arc::new(base_chain());
    let mut per_request = base.child_chain([]);
    per_request.use_request(|request| request.set_header("X-Demo", "echo-chain"));

    let handler = per_request.exec(echo());
    let response = handler
        .handle(Context::background(), &mut Request::empty())
        .await?;
    println!("echo: {}", response.text().unwrap_or("<binary>"));

    // Over the network, when asked to
    let Some(target) = std::env::args().nth(1) else {
        info!("no URL given, skipping the network call");
        return Ok(());
    };

    let client = Client::builder()
        .with_logging()
        .with_error_for_status()
        .with_timeout(Duration::from_secs(10))
        .middleware(RequestId::default())
        .build();

    let mut request = Request::new(Method::Get, Url::parse(&target)?);
    let response = client.send(Context::background(), &mut request).await?;
    println!("{}", response.status_text());
    println!("{}", response.text().unwrap_or("<binary>"));

    Ok(())
}

// ============================================================================
// Tests using wiremock
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    #[tokio::test]
    async fn test_echo_sees_every_header() {
        let base = Arc::new(base_chain());
        let mut per_request = base.child_chain([]);
        per_request.use_request(|request| request.set_header("X-Demo", "echo-chain"));

        let response = per_request
            .exec(echo())
            .handle(Context::background(), &mut Request::empty())
            .await
            .expect("response");

        let body: serde_json::Value = response.json().expect("json");
        assert_eq!(body["accept"], "application/json");
        assert_eq!(body["x-request-id"], "1");
        assert_eq!(body["x-demo"], "echo-chain");
    }

    #[tokio::test]
    async fn test_request_ids_increase() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header("X-Request-Id", "1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header("X-Request-Id", "2"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = Client::builder().middleware(RequestId::default()).build();
        let url = Url::parse(&format!("{}/ping", mock_server.uri())).expect("url");

        let first = client
            .send(Context::background(), &mut Request::new(Method::Get, url.clone()))
            .await
            .expect("first");
        let second = client
            .send(Context::background(), &mut Request::new(Method::Get, url))
            .await
            .expect("second");

        assert_eq!(first.status(), 200);
        assert_eq!(second.status(), 202);
    }
}
