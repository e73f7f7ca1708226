//! A ready-to-use client: a shared base chain in front of a [`HyperClient`].

use std::sync::Arc;
use std::time::Duration;

use shallot_core::{
    BoxFuture, BoxHandler, BoxMiddleware, Chain, Context, Handler, Middleware, Request, Response,
    Result,
};

use crate::{
    ClientConfig, ContextTransport, HyperClient,
    middleware::{LoggingLayer, basic_auth, bearer_auth, error_for_status, timeout},
    set_client,
};

/// HTTP client running every request through a base middleware chain.
///
/// The base chain is frozen when the client is built and shared by all its
/// clones. Per-request middlewares go through [`Client::send_with`], which
/// layers them inside the base chain without touching it.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use shallot::{Client, Context, Method, Request};
/// use url::Url;
///
/// # async fn run() -> shallot::Result<()> {
/// let client = Client::builder()
///     .with_logging()
///     .with_error_for_status()
///     .with_timeout(Duration::from_secs(10))
///     .with_bearer_auth("my-token")
///     .build();
///
/// let url = Url::parse("https://api.example.com/users/42")?;
/// let mut request = Request::new(Method::Get, url);
/// let response = client.send(Context::background(), &mut request).await?;
/// println!("{}", response.status_text());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    base: Arc<Chain>,
    transport: HyperClient,
    handler: BoxHandler,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base", &self.base)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Create a client with default configuration and an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// The base chain shared by every request.
    #[must_use]
    pub fn chain(&self) -> &Arc<Chain> {
        &self.base
    }

    /// The terminal transport.
    #[must_use]
    pub fn transport(&self) -> &HyperClient {
        &self.transport
    }

    /// Send `request` through the base chain.
    ///
    /// The transport is placed in the context (see [`get_client`](crate::get_client))
    /// before the chain runs, replacing any client the caller already set
    /// there. The request is left as the middlewares modified it.
    ///
    /// # Errors
    ///
    /// Returns whatever the chain or the transport fails with.
    pub async fn send(&self, ctx: Context, request: &mut Request) -> Result<Response> {
        let ctx = set_client(&ctx, self.transport.clone());
        self.handler.handle(ctx, request).await
    }

    /// Send `request` through the base chain plus `extra` middlewares.
    ///
    /// The extra middlewares form a child chain of the base one: base
    /// middlewares run first on the way in and last on the way out. As with
    /// [`Client::send`], this client's transport replaces any client already
    /// carried by `ctx`.
    ///
    /// # Errors
    ///
    /// Returns whatever the chain or the transport fails with.
    pub async fn send_with(
        &self,
        ctx: Context,
        request: &mut Request,
        extra: impl IntoIterator<Item = BoxMiddleware>,
    ) -> Result<Response> {
        let handler = self
            .base
            .child_chain(extra)
            .exec(Arc::new(ContextTransport));
        let ctx = set_client(&ctx, self.transport.clone());
        handler.handle(ctx, request).await
    }
}

impl Handler for Client {
    fn handle<'a>(
        &'a self,
        ctx: Context,
        request: &'a mut Request,
    ) -> BoxFuture<'a, Result<Response>> {
        Box::pin(self.send(ctx, request))
    }
}

/// Builder for [`Client`].
///
/// Middlewares run in the order they are added.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    chain: Chain,
}

impl ClientBuilder {
    // ========================================================================
    // Transport Configuration
    // ========================================================================

    /// Replace the whole transport configuration.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the transport timeout (applied to each exchange, not a middleware).
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the default `User-Agent`.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    // ========================================================================
    // Middleware
    // ========================================================================

    /// Append a middleware to the base chain.
    #[must_use]
    pub fn middleware(mut self, middleware: impl Middleware + 'static) -> Self {
        self.chain.use_middleware(middleware);
        self
    }

    /// Append a [`LoggingLayer`].
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.middleware(LoggingLayer::new())
    }

    /// Append a bearer authentication middleware.
    #[must_use]
    pub fn with_bearer_auth(self, token: impl AsRef<str>) -> Self {
        self.middleware(bearer_auth(token))
    }

    /// Append a basic authentication middleware.
    #[must_use]
    pub fn with_basic_auth(self, username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        self.middleware(basic_auth(username, password))
    }

    /// Append a deadline for everything after this point of the chain.
    #[must_use]
    pub fn with_timeout(self, duration: Duration) -> Self {
        self.middleware(timeout(duration))
    }

    /// Append [`error_for_status`].
    #[must_use]
    pub fn with_error_for_status(self) -> Self {
        self.middleware(error_for_status())
    }

    /// Build the client.
    #[must_use]
    pub fn build(self) -> Client {
        let transport = HyperClient::with_config(self.config);
        let base = Arc::new(self.chain);
        let handler = base.exec(Arc::new(ContextTransport));
        Client {
            base,
            transport,
            handler,
        }
    }
}
