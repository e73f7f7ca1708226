//! # Chapter 1: Chains
//!
//! ## Ordering
//!
//! A [`Chain`](crate::Chain) runs its middlewares in the order they were added.
//! The first one sees the request first and the response last:
//!
//! ```ignore
//! use shallot::Chain;
//! use shallot::middleware::{LoggingLayer, bearer_auth};
//!
//! let mut chain = Chain::default();
//! chain
//!     .use_middleware(LoggingLayer::new())   // outermost
//!     .use_middleware(bearer_auth("token")); // innermost
//!
//! let handler = chain.exec(Arc::new(HyperClient::new()));
//! ```
//!
//! A chain is itself a middleware, so chains nest.
//!
//! ## Parents
//!
//! A child chain runs its parent's middlewares around its own. Use it to add
//! per-request behavior to a shared base chain:
//!
//! ```ignore
//! let base = Arc::new(base_chain);
//! let mut per_request = base.child_chain([]);
//! per_request.use_request(|request| request.set_header("X-Request-Id", "42"));
//! ```
//!
//! The parent is shared, never modified by the child.
//!
//! ## Copies
//!
//! [`Chain::copy`](crate::Chain::copy) returns a new chain with the same
//! middlewares and no parent. Adding to the copy leaves the original alone.
//!
//! ## Next Steps
//!
//! Continue to [Chapter 2: The Client](super::chapter_2).
