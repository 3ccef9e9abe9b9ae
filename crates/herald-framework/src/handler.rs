//! Command handlers.
//!
//! A handler is any async function taking a [`CommandContext`] whose output
//! implements [`HandleResponse`]:
//!
//! ```rust,ignore
//! // No return value
//! async fn stock(ctx: CommandContext) {
//!     ctx.reply("3 keys left").await;
//! }
//!
//! // Return a String - it is sent back to the actor
//! async fn ping(_ctx: CommandContext) -> String {
//!     "pong".to_string()
//! }
//!
//! // Return a Result - errors are logged, never shown to the actor
//! async fn unban(ctx: CommandContext) -> anyhow::Result<String> {
//!     // ...
//!     Ok("Unbanned".to_string())
//! }
//! ```
//!
//! Failures inside a handler belong to the handler: the dispatcher never
//! catches, retries or translates them.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::error;

use crate::context::CommandContext;

// ============================================================================
// HandleResponse - Handle handler return values
// ============================================================================

/// A trait for types that can be returned from a handler.
#[async_trait]
pub trait HandleResponse: Send {
    /// Acts on this value once the handler has finished.
    async fn into_response(self, ctx: &CommandContext);
}

#[async_trait]
impl HandleResponse for () {
    async fn into_response(self, _ctx: &CommandContext) {}
}

/// Sends the string back to the actor.
#[async_trait]
impl HandleResponse for String {
    async fn into_response(self, ctx: &CommandContext) {
        ctx.reply(&self).await;
    }
}

#[async_trait]
impl HandleResponse for &'static str {
    async fn into_response(self, ctx: &CommandContext) {
        ctx.reply(self).await;
    }
}

#[async_trait]
impl<T: HandleResponse> HandleResponse for Option<T> {
    async fn into_response(self, ctx: &CommandContext) {
        if let Some(t) = self {
            t.into_response(ctx).await;
        }
    }
}

/// Handles `Ok` like `T`; logs `Err` without telling the actor.
#[async_trait]
impl<T: HandleResponse, E: std::fmt::Display + Send> HandleResponse for Result<T, E> {
    async fn into_response(self, ctx: &CommandContext) {
        match self {
            Ok(t) => t.into_response(ctx).await,
            Err(e) => {
                error!(
                    command = ctx.command(),
                    actor = ctx.actor_id(),
                    "Handler error: {e}"
                );
            }
        }
    }
}

// ============================================================================
// Handler Trait
// ============================================================================

/// The trait implemented by every command handler.
///
/// Automatically implemented for `async fn(CommandContext) -> R` where `R`
/// implements [`HandleResponse`].
#[async_trait]
pub trait Handler: Clone + Send + Sync + 'static {
    /// Runs the handler for one invocation.
    async fn call(self, ctx: CommandContext);
}

#[async_trait]
impl<F, Fut, Res> Handler for F
where
    F: FnOnce(CommandContext) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Res> + Send + 'static,
    Res: HandleResponse + 'static,
{
    async fn call(self, ctx: CommandContext) {
        let res = (self)(ctx.clone()).await;
        res.into_response(&ctx).await;
    }
}

// ============================================================================
// BoxedHandler - Type-erased handler stored in descriptors
// ============================================================================

/// A type-erased handler that can be stored in a descriptor.
pub type BoxedHandler = Arc<dyn Fn(CommandContext) -> BoxFuture<'static, ()> + Send + Sync>;

/// Converts a handler into a [`BoxedHandler`].
pub fn into_handler<H: Handler>(handler: H) -> BoxedHandler {
    Arc::new(move |ctx| handler.clone().call(ctx))
}
