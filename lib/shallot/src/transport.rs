//! Terminal handlers performing the actual HTTP exchange.

use std::sync::Arc;

use bytes::Bytes;
use http::header::USER_AGENT;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use shallot_core::{BoxFuture, Context, Error, Handler, Request, Response, Result};
use tracing::{debug, trace};

use crate::{ClientConfig, connector::https_connector, get_client};

/// HTTP transport using hyper-util with connection pooling and TLS.
///
/// This is the terminal [`Handler`] of a pipeline: it sends the request as
/// the middlewares left it and buffers the whole response body. It never
/// fails on an HTTP status; see
/// [`error_for_status`](crate::middleware::error_for_status) for that.
///
/// The exchange is bound to the [`Context`]: it stops with
/// [`Error::canceled`] when the context is cancelled, and with
/// [`Error::timeout`] when the context deadline or the configured timeout
/// elapses, whichever comes first.
///
/// Cloning is cheap and clones share the connection pool.
#[derive(Clone)]
pub struct HyperClient {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    config: Arc<ClientConfig>,
}

impl std::fmt::Debug for HyperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for HyperClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HyperClient {
    /// Create a new client with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        let connector = https_connector(&config);

        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(connector);

        Self {
            inner,
            config: Arc::new(config),
        }
    }

    /// Get the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send `request` and buffer the response.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::InvalidRequest`](shallot_core::ErrorKind::InvalidRequest)
    /// when the request has no URL, with a connection or TLS error when the
    /// exchange fails, and with a timeout or cancellation error when the
    /// context finishes first.
    pub async fn execute(&self, ctx: &Context, request: &Request) -> Result<Response> {
        let hyper_request = self.build_hyper_request(request)?;
        debug!(
            method = %request.method(),
            url = %hyper_request.uri(),
            "sending request"
        );

        let exchange = async {
            let response = self
                .inner
                .request(hyper_request)
                .await
                .map_err(Self::map_hyper_error)?;

            let (parts, body) = response.into_parts();
            let body = body
                .collect()
                .await
                .map_err(|e| Error::connection(e.to_string()))?
                .to_bytes();
            trace!(status = parts.status.as_u16(), body_len = body.len(), "response received");

            Ok::<_, Error>(
                Response::new(parts.status.as_u16(), parts.headers, body)
                    .with_version(parts.version),
            )
        };

        let ctx = ctx.with_timeout(self.config.timeout);
        ctx.run(exchange).await?
    }

    /// Build a hyper request from a shallot request.
    fn build_hyper_request(&self, request: &Request) -> Result<http::Request<Full<Bytes>>> {
        let url = request
            .url()
            .ok_or_else(|| Error::invalid_request("request has no URL"))?;

        let mut http_request = http::Request::builder()
            .method(http::Method::from(request.method()))
            .uri(url.as_str())
            .body(Full::new(request.body().clone()))
            .map_err(|e| Error::invalid_request(e.to_string()))?;

        let headers = http_request.headers_mut();
        headers.clone_from(request.headers());
        if let Some(user_agent) = &self.config.user_agent
            && !headers.contains_key(USER_AGENT)
        {
            let value = http::HeaderValue::from_str(user_agent)
                .map_err(|e| Error::invalid_request(format!("invalid user agent: {e}")))?;
            headers.insert(USER_AGENT, value);
        }

        Ok(http_request)
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        let msg = match std::error::Error::source(&err) {
            Some(source) => format!("{err}: {source}"),
            None => err.to_string(),
        };

        if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
            return Error::tls(msg);
        }

        Error::connection(msg)
    }
}

impl Handler for HyperClient {
    fn handle<'a>(
        &'a self,
        ctx: Context,
        request: &'a mut Request,
    ) -> BoxFuture<'a, Result<Response>> {
        Box::pin(async move { self.execute(&ctx, request).await })
    }
}

/// Terminal handler sending through the [`HyperClient`] carried by the context.
///
/// Lets a pipeline be built once and executed with whichever client the
/// caller placed in the context with [`set_client`](crate::set_client).
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextTransport;

impl Handler for ContextTransport {
    fn handle<'a>(
        &'a self,
        ctx: Context,
        request: &'a mut Request,
    ) -> BoxFuture<'a, Result<Response>> {
        Box::pin(async move {
            let client = get_client(&ctx)
                .ok_or_else(|| Error::invalid_request("no client in context"))?;
            client.execute(&ctx, request).await
        })
    }
}
