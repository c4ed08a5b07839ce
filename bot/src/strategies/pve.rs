use async_trait::async_trait;
use walls_battle::HookEvent;
use walls_client::GameApi;

use super::{require_path, require_positive};
use crate::context::BotContext;
use crate::error::BotError;
use crate::strategy::Strategy;

#[derive(Debug, Clone, PartialEq)]
pub struct PveOptions {
    /// Destinations leading to the hunting ground
    pub target_path: Vec<u32>,

    /// Destinations leading back to a safe spot
    pub rest_path: Vec<u32>,

    pub min_health: i32,

    /// Rest until at least this much HP before heading out
    pub optimal_health: Option<i32>,
}

/// Travel to a monster area, fight whatever attacks, travel back
pub struct Pve {
    options: PveOptions,
}

impl Pve {
    pub fn new(options: PveOptions) -> Result<Self, BotError> {
        require_path(&options.target_path, "target_path")?;
        require_path(&options.rest_path, "rest_path")?;
        require_positive(options.min_health, "min_health")?;

        if let Some(optimal) = options.optimal_health {
            if optimal < options.min_health {
                return Err(BotError::InvalidConfig(format!(
                    "optimal_health ({optimal}) is below min_health ({})",
                    options.min_health
                )));
            }
        }

        Ok(Self { options })
    }

    pub fn options(&self) -> &PveOptions {
        &self.options
    }
}

#[async_trait]
impl<C: GameApi + 'static> Strategy<C> for Pve {
    fn name(&self) -> &'static str {
        "PvE"
    }

    async fn execute_cycle(&mut self, ctx: &mut BotContext<C>) -> Result<(), BotError> {
        let cycle = ctx.begin_cycle();
        tracing::info!(cycle, "Starting PvE cycle #{}", cycle);

        let snapshot = ctx.api().poll_state().await?;
        ctx.fire(HookEvent::CycleStarted, &snapshot).await?;

        let health = ctx.check_health(self.options.min_health).await?;
        let below_optimal = self
            .options
            .optimal_health
            .is_some_and(|optimal| health.current < optimal);

        // under min_health we rest even mid-battle; optimal_health only delays heading out
        if !health.has_enough_health || (!health.in_battle && below_optimal) {
            let rest = ctx.timing().rest_interval;
            ctx.rest(rest).await;
            return Ok(());
        }

        if health.in_battle {
            tracing::warn!("Already in battle! Jumping straight to attack loop...");
            ctx.fight().await?;
        } else {
            ctx.travel_path(&self.options.target_path, "Starting journey to target")
                .await?;
            ctx.wait_and_fight().await?;
        }

        ctx.travel_path(&self.options.rest_path, "Returning to rest location")
            .await?;

        tracing::info!(cycle, "PvE cycle #{} complete!", cycle);
        let snapshot = ctx.api().poll_state().await?;
        ctx.fire(HookEvent::CycleCompleted, &snapshot).await?;

        Ok(())
    }
}
