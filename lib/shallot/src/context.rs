//! Carrying a [`HyperClient`] through a pipeline in the [`Context`].

use shallot_core::Context;

use crate::HyperClient;

// Module-private key type: nothing outside this module can read or replace it.
#[derive(Clone)]
struct ClientKey(HyperClient);

/// Derive a context carrying `client`.
///
/// The original context is left untouched.
#[must_use]
pub fn set_client(ctx: &Context, client: HyperClient) -> Context {
    ctx.with_value(ClientKey(client))
}

/// The client carried by `ctx`, if any.
#[must_use]
pub fn get_client(ctx: &Context) -> Option<HyperClient> {
    ctx.value::<ClientKey>().map(|ClientKey(client)| client.clone())
}
