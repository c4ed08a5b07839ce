use walls_client::GameApi;

use crate::context::BotContext;
use crate::error::BotError;
use crate::status::CycleStatus;
use crate::strategy::Strategy;

/// A strategy bound to its context, run under a supervisor
pub struct Bot<C> {
    ctx: BotContext<C>,
    strategy: Box<dyn Strategy<C>>,
}

impl<C: GameApi + 'static> Bot<C> {
    pub fn new<S: Strategy<C> + 'static>(ctx: BotContext<C>, strategy: S) -> Self {
        Self::from_boxed(ctx, Box::new(strategy))
    }

    pub fn from_boxed(ctx: BotContext<C>, strategy: Box<dyn Strategy<C>>) -> Self {
        Self { ctx, strategy }
    }

    pub fn context(&self) -> &BotContext<C> {
        &self.ctx
    }

    pub fn status(&self) -> CycleStatus {
        self.ctx.status()
    }

    pub fn cycle_count(&self) -> u64 {
        self.ctx.cycle_count()
    }

    /// Run one cycle and return its outcome unhandled
    pub async fn run_cycle(&mut self) -> Result<(), BotError> {
        self.strategy.execute_cycle(&mut self.ctx).await
    }

    /// Run one cycle; on failure log it and wait out the cooldown.
    ///
    /// Returns whether the cycle succeeded.
    pub async fn supervised_cycle(&mut self) -> bool {
        match self.run_cycle().await {
            Ok(()) => true,
            Err(e) => {
                let cooldown = self.strategy.error_cooldown();
                self.ctx.set_status(CycleStatus::Error);
                tracing::error!(
                    error = %e,
                    cycle = self.ctx.cycle_count(),
                    "Error during bot execution"
                );
                tracing::warn!("Restarting in {} seconds...", cooldown.as_secs_f64());
                tokio::time::sleep(cooldown).await;
                false
            }
        }
    }

    /// Repeat cycles forever. Cycle errors never end the loop.
    pub async fn run_forever(mut self) {
        tracing::info!(strategy = self.strategy.name(), "Bot starting...");

        loop {
            self.supervised_cycle().await;
        }
    }
}
