use std::time::Duration;

use async_trait::async_trait;
use walls_client::GameApi;

use crate::context::BotContext;
use crate::error::BotError;

/// Cooldown before a failed cycle is retried, unless a strategy overrides it
pub const DEFAULT_ERROR_COOLDOWN: Duration = Duration::from_secs(2);

/// One kind of bot behaviour.
///
/// A strategy only decides what a single cycle does; the [`Bot`](crate::Bot)
/// runner repeats cycles and recovers from failures.
#[async_trait]
pub trait Strategy<C: GameApi>: Send {
    fn name(&self) -> &'static str;

    async fn execute_cycle(&mut self, ctx: &mut BotContext<C>) -> Result<(), BotError>;

    fn error_cooldown(&self) -> Duration {
        DEFAULT_ERROR_COOLDOWN
    }
}
