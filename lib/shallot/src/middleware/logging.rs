//! Request/response logging middleware.
//!
//! This middleware logs HTTP requests and responses using the `tracing` crate.

use std::sync::Arc;
use std::time::Instant;

use shallot_core::{BoxFuture, BoxHandler, Context, Handler, Middleware, Request, Response, Result};
use tracing::{Instrument, Level, debug, info, span, warn};

/// Middleware logging each exchange.
///
/// The outcome of the rest of the chain is returned unchanged: logging a
/// failure never turns it into something else, and never stops the process.
///
/// # Example
///
/// ```
/// use shallot::middleware::LoggingLayer;
/// use shallot_core::Chain;
///
/// let mut chain = Chain::default();
/// chain.use_middleware(LoggingLayer::debug());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// Log level for the logging middleware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Log at debug level (request/response details).
    Debug,
    /// Log at info level (summary only).
    #[default]
    Info,
}

impl LoggingLayer {
    /// Create a new logging layer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logging layer that also logs headers at debug level.
    #[must_use]
    pub const fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }

    /// Level of this layer.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl Middleware for LoggingLayer {
    fn exec(&self, next: BoxHandler) -> BoxHandler {
        Arc::new(Logging {
            next,
            level: self.level,
        })
    }
}

struct Logging {
    next: BoxHandler,
    level: LogLevel,
}

impl Handler for Logging {
    fn handle<'a>(
        &'a self,
        ctx: Context,
        request: &'a mut Request,
    ) -> BoxFuture<'a, Result<Response>> {
        let method = request.method();
        let url = request.url().map(ToString::to_string).unwrap_or_default();
        let span = span!(Level::INFO, "http_request", %method, %url);

        Box::pin(
            async move {
                let start = Instant::now();

                match self.level {
                    LogLevel::Debug => {
                        debug!(headers = ?request.headers(), body_len = request.body().len(), "sending request");
                    }
                    LogLevel::Info => info!("sending request"),
                }

                let result = self.next.handle(ctx, request).await;

                // Saturating conversion to u64
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) => {
                        let status = response.status();
                        if response.is_success() {
                            info!(status, elapsed_ms, "request completed");
                        } else {
                            warn!(status, elapsed_ms, "request completed with HTTP error");
                        }
                        if self.level == LogLevel::Debug {
                            debug!(headers = ?response.headers(), body_len = response.body().len(), "response");
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, status = ?err.status(), elapsed_ms, "request failed");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}
