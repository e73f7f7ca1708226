//! Execution context threaded through every handler invocation.
//!
//! A [`Context`] carries cancellation, an optional deadline, and typed ambient
//! values. It is persistent: every `with_*` method returns a derived context and
//! leaves the receiver untouched, so "changing" the context of a pipeline means
//! handing a derived value to the next handler (see
//! [`ContextProcessor`](crate::ContextProcessor)).
//!
//! Values are keyed by their Rust type. A module that wants a private slot
//! declares a private newtype and stores that, so unrelated code storing a value
//! of the same underlying type can never read or overwrite it:
//!
//! ```
//! use shallot_core::Context;
//!
//! #[derive(Clone)]
//! struct TenantKey(String);
//!
//! let ctx = Context::background().with_value(TenantKey("acme".to_string()));
//! assert_eq!(ctx.value::<TenantKey>().map(|t| t.0.as_str()), Some("acme"));
//! assert!(Context::background().value::<TenantKey>().is_none());
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use http::Extensions;
use tokio_util::sync::CancellationToken;

use crate::{Error, Result};

/// Cancellation, deadline and typed values for one pipeline invocation.
#[derive(Debug, Clone, Default)]
pub struct Context {
    values: Arc<Extensions>,
    deadline: Option<Instant>,
    cancel: Option<CancellationToken>,
}

impl Context {
    /// Root context: no values, no deadline, never cancelled.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context holding `value`, replacing any value of the same type.
    #[must_use]
    pub fn with_value<T>(&self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        let mut values = Extensions::clone(&self.values);
        values.insert(value);
        Self {
            values: Arc::new(values),
            ..self.clone()
        }
    }

    /// Value of type `T`, if one was attached.
    #[must_use]
    pub fn value<T>(&self) -> Option<&T>
    where
        T: Send + Sync + 'static,
    {
        self.values.get::<T>()
    }

    /// Derive a context that expires at `deadline`.
    ///
    /// An inherited deadline that is earlier is kept.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current <= deadline => current,
            _ => deadline,
        };
        Self {
            deadline: Some(deadline),
            ..self.clone()
        }
    }

    /// Derive a context that expires after `timeout` from now.
    ///
    /// A timeout too large to be represented as an instant adds no deadline.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.clone(),
        }
    }

    /// Derive a cancellable context.
    ///
    /// Cancelling the returned token cancels the derived context (and its
    /// descendants) but not the receiver. Cancelling an inherited token also
    /// cancels the derived context.
    #[must_use]
    pub fn with_cancel(&self) -> (Self, CancellationToken) {
        let token = self
            .cancel
            .as_ref()
            .map_or_else(CancellationToken::new, CancellationToken::child_token);
        let ctx = Self {
            cancel: Some(token.clone()),
            ..self.clone()
        };
        (ctx, token)
    }

    /// Deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, if any; zero once it has passed.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Returns `true` once the context is cancelled or its deadline has passed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Why the context is done: [`Error::canceled`] or [`Error::timeout`].
    #[must_use]
    pub fn err(&self) -> Option<Error> {
        if self
            .cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
        {
            return Some(Error::canceled());
        }
        if self.deadline.is_some_and(|deadline| deadline <= Instant::now()) {
            return Some(Error::timeout());
        }
        None
    }

    /// Resolves once the context is cancelled or its deadline elapses.
    ///
    /// Never resolves for a context with neither.
    pub async fn done(&self) {
        let cancelled = async {
            match &self.cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    () = cancelled => {}
                    () = tokio::time::sleep_until(deadline.into()) => {}
                }
            }
            None => cancelled.await,
        }
    }

    /// Drive `future` unless the context finishes first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::canceled`] or [`Error::timeout`] when the context is done
    /// before `future` completes, without polling `future` any further.
    pub async fn run<F>(&self, future: F) -> Result<F::Output>
    where
        F: Future,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }
        tokio::select! {
            biased;
            output = future => Ok(output),
            () = self.done() => Err(self.err().unwrap_or_else(Error::timeout)),
        }
    }
}
