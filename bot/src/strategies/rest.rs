use std::time::Duration;

use async_trait::async_trait;
use walls_client::GameApi;

use super::require_path;
use crate::context::BotContext;
use crate::error::BotError;
use crate::strategy::Strategy;

pub const DEFAULT_REST_DURATION: Duration = Duration::from_secs(60);

/// Go to a safe spot and sit there
pub struct Rest {
    location: Vec<u32>,
    duration: Duration,
}

impl Rest {
    pub fn new(location: Vec<u32>, duration: Duration) -> Result<Self, BotError> {
        require_path(&location, "rest location")?;
        Ok(Self { location, duration })
    }
}

#[async_trait]
impl<C: GameApi + 'static> Strategy<C> for Rest {
    fn name(&self) -> &'static str {
        "Rest"
    }

    async fn execute_cycle(&mut self, ctx: &mut BotContext<C>) -> Result<(), BotError> {
        let cycle = ctx.begin_cycle();
        tracing::info!(cycle, "Starting rest cycle #{}", cycle);

        ctx.travel_path(&self.location, "Traveling to rest location")
            .await?;
        ctx.rest(self.duration).await;

        tracing::info!(cycle, "Rest cycle #{} complete", cycle);
        Ok(())
    }

    fn error_cooldown(&self) -> Duration {
        Duration::from_secs(5)
    }
}
