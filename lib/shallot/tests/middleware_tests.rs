//! Integration tests for `Client` and its middlewares.

use std::sync::Arc;
use std::time::Duration;

use assert2::{check, let_assert};
use shallot::middleware::{LoggingLayer, set_header};
use shallot::{
    BoxMiddleware, Chain, Client, Context, ContextTransport, Error, Handler, HyperClient, Method,
    Middleware, Request, RequestProcessor, ResponseProcessor, get_client, set_client,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

fn get(server: &MockServer, path: &str) -> Request {
    let url = url::Url::parse(&format!("{}{path}", server.uri())).expect("url");
    Request::new(Method::Get, url)
}

/// Test that bearer auth middleware adds Authorization header.
#[tokio::test]
async fn test_bearer_auth_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/protected"))
        .and(header("Authorization", "Bearer my-secret-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"user": "alice"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .with_bearer_auth("my-secret-token")
        .build();

    let mut request = get(&mock_server, "/protected");
    let response = client
        .send(Context::background(), &mut request)
        .await
        .expect("response");

    check!(response.is_success());
    // the caller observes what the chain did to its request
    check!(request.header("authorization") == Some("Bearer my-secret-token"));
}

/// Test that basic auth middleware adds Authorization header.
#[tokio::test]
async fn test_basic_auth_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/basic"))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder().with_basic_auth("user", "pass").build();

    let response = client
        .send(Context::background(), &mut get(&mock_server, "/basic"))
        .await
        .expect("response");

    check!(response.is_success());
}

/// Test that logging middleware doesn't break request/response flow.
#[tokio::test]
async fn test_logging_middleware() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/logged"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .middleware(LoggingLayer::debug())
        .build();

    let response = client
        .send(Context::background(), &mut get(&mock_server, "/logged"))
        .await
        .expect("response");

    check!(response.status() == 500);
}

#[tokio::test]
async fn test_error_for_status_keeps_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"code": "missing"})),
        )
        .mount(&mock_server)
        .await;

    let client = Client::builder().with_error_for_status().build();

    let result = client
        .send(Context::background(), &mut get(&mock_server, "/missing"))
        .await;

    let_assert!(Err(err) = result);
    check!(err.status() == Some(404));
    let_assert!(Some(Ok(body)) = err.decode_body::<serde_json::Value>());
    check!(body["code"] == "missing");
}

#[tokio::test]
async fn test_timeout_middleware() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .with_timeout(Duration::from_millis(100))
        .build();

    let result = client
        .send(Context::background(), &mut get(&mock_server, "/slow"))
        .await;

    let_assert!(Err(err) = result);
    check!(err.is_timeout());
}

/// A request processor failing stops the chain before anything is sent.
#[tokio::test]
async fn test_request_processor_failure_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .middleware(RequestProcessor::new(|_request: &mut Request| {
            Err(Error::aborted("offline mode"))
        }))
        .build();

    let result = client
        .send(Context::background(), &mut get(&mock_server, "/anything"))
        .await;

    let_assert!(Err(err) = result);
    check!(err == Error::aborted("offline mode"));
}

/// Base middlewares wrap per-request ones.
#[tokio::test]
async fn test_send_with_layers_inside_base_chain() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/layered"))
        .and(header("X-Layer", "request"))
        .and(header("X-Base", "yes"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .middleware(set_header("X-Layer", "base"))
        .middleware(set_header("X-Base", "yes"))
        .build();

    // the per-request value is set after the base one, so it wins
    let extra: BoxMiddleware = Arc::new(set_header("X-Layer", "request"));
    let response = client
        .send_with(
            Context::background(),
            &mut get(&mock_server, "/layered"),
            [extra],
        )
        .await
        .expect("response");

    check!(response.is_success());
    check!(client.chain().len() == 2);
}

/// Each middleware of the chain adds its header, and the server sees them all.
#[tokio::test]
async fn test_chain_headers_reach_the_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/xy"))
        .and(header("X", "1"))
        .and(header("Y", "2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut chain = Chain::default();
    chain
        .use_request(|request| request.set_header("X", "1"))
        .use_request(|request| request.set_header("Y", "2"));
    let handler = chain.exec(Arc::new(HyperClient::new()));

    let mut request = get(&mock_server, "/xy");
    let response = handler
        .handle(Context::background(), &mut request)
        .await
        .expect("response");

    check!(response.is_success());
    check!(request.header("x") == Some("1"));
    check!(request.header("y") == Some("2"));
}

/// The client placed in the context is the one used by `ContextTransport`.
#[tokio::test]
async fn test_context_transport_uses_context_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ctx"))
        .and(header("User-Agent", "ctx-client/1.0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = shallot::ClientConfig::builder()
        .user_agent("ctx-client/1.0")
        .build();
    let ctx = set_client(&Context::background(), HyperClient::with_config(config));

    let mut chain = Chain::default();
    chain.use_response(|outcome| {
        assert!(outcome.is_ok());
        Ok(())
    });
    let handler = chain.exec(Arc::new(ContextTransport));

    let response = handler
        .handle(ctx, &mut get(&mock_server, "/ctx"))
        .await
        .expect("response");

    check!(response.is_success());
}

/// `Client::send` makes its transport visible to middlewares.
#[tokio::test]
async fn test_send_places_client_in_context() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .timeout(Duration::from_secs(7))
        .middleware(shallot::ContextProcessor::new(|ctx: &Context| {
            let timeout = get_client(ctx).map(|client| client.config().timeout);
            assert_eq!(timeout, Some(Duration::from_secs(7)));
            ctx.clone()
        }))
        .build();

    let response = client
        .send(Context::background(), &mut get(&mock_server, "/"))
        .await
        .expect("response");

    check!(response.is_success());
}

/// A client already carried by the context is replaced by the sending client's transport.
#[tokio::test]
async fn test_send_replaces_caller_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let caller = shallot::ClientConfig::builder()
        .timeout(Duration::from_secs(3))
        .build();
    let ctx = set_client(&Context::background(), HyperClient::with_config(caller));

    let client = Client::builder()
        .timeout(Duration::from_secs(7))
        .middleware(shallot::ContextProcessor::new(|ctx: &Context| {
            let timeout = get_client(ctx).map(|client| client.config().timeout);
            assert_eq!(timeout, Some(Duration::from_secs(7)));
            ctx.clone()
        }))
        .build();

    let response = client
        .send(ctx.clone(), &mut get(&mock_server, "/"))
        .await
        .expect("response");
    check!(response.is_success());

    let response = client
        .send_with(ctx.clone(), &mut get(&mock_server, "/"), Vec::<BoxMiddleware>::new())
        .await
        .expect("response");
    check!(response.is_success());

    // the caller's context still carries its own client
    let kept = get_client(&ctx).map(|client| client.config().timeout);
    check!(kept == Some(Duration::from_secs(3)));
}

/// A response processor can reject an otherwise successful exchange.
#[tokio::test]
async fn test_response_processor_rejects_missing_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("unsigned"))
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .middleware(ResponseProcessor::new(|outcome: &shallot::Result<shallot::Response>| {
            match outcome {
                Ok(response) if response.header("x-signature").is_none() => {
                    Err(Error::custom("missing signature"))
                }
                _ => Ok(()),
            }
        }))
        .build();

    let result = client
        .send(Context::background(), &mut get(&mock_server, "/"))
        .await;

    let_assert!(Err(err) = result);
    check!(err.to_string() == "missing signature");
    let_assert!(Some(response) = err.response());
    check!(response.text() == Ok("unsigned"));
}
