use std::time::Duration;

use async_trait::async_trait;
use walls_client::GameApi;

use super::require_path;
use crate::context::BotContext;
use crate::error::BotError;
use crate::strategy::Strategy;

const SEGMENT_PAUSE: Duration = Duration::from_secs(2);

/// Walk a rotation of routes, fighting whenever something engages us
pub struct Patrol {
    routes: Vec<Vec<u32>>,
    next: usize,
}

impl Patrol {
    pub fn new(routes: Vec<Vec<u32>>) -> Result<Self, BotError> {
        if routes.is_empty() {
            return Err(BotError::InvalidConfig(
                "patrol needs at least one route".to_string(),
            ));
        }
        for route in &routes {
            require_path(route, "patrol route")?;
        }

        Ok(Self { routes, next: 0 })
    }
}

#[async_trait]
impl<C: GameApi + 'static> Strategy<C> for Patrol {
    fn name(&self) -> &'static str {
        "Patrol"
    }

    async fn execute_cycle(&mut self, ctx: &mut BotContext<C>) -> Result<(), BotError> {
        let cycle = ctx.begin_cycle();
        let segment = self.next;
        tracing::info!(cycle, segment, "Patrol cycle #{}", cycle);

        ctx.travel_path(&self.routes[segment], &format!("Patrolling segment {}", segment + 1))
            .await?;

        if ctx.combat().is_in_battle().await? {
            tracing::info!("Encountered battle during patrol!");
            ctx.fight().await?;
        }

        self.next = (segment + 1) % self.routes.len();
        tokio::time::sleep(SEGMENT_PAUSE).await;

        Ok(())
    }

    fn error_cooldown(&self) -> Duration {
        Duration::from_secs(5)
    }
}
