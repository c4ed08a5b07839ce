use std::sync::Arc;

use async_trait::async_trait;
use walls_battle::{Hook, HookContext};
use walls_client::GameApi;
use walls_protocol::percent_of;

/// Drinks a consumable when health falls under a percentage of max HP.
///
/// Meant for `cycleStarted` and `afterAttack`. After an attack the HP from
/// the attack result is used, since the snapshot predates the turn.
pub struct HealOnLowHealth<C> {
    api: Arc<C>,
    item_id: String,
    below_percent: i32,
}

impl<C: GameApi> HealOnLowHealth<C> {
    pub fn new(api: Arc<C>, item_id: impl Into<String>, below_percent: i32) -> Self {
        Self {
            api,
            item_id: item_id.into(),
            below_percent,
        }
    }
}

#[async_trait]
impl<C: GameApi> Hook for HealOnLowHealth<C> {
    async fn call(&self, ctx: &HookContext<'_>) -> anyhow::Result<()> {
        let player = &ctx.snapshot.player;
        let current = ctx
            .attack
            .and_then(|attack| attack.result())
            .map_or(player.health.current, |result| result.your_health);

        let percent = percent_of(current, player.health.max);
        if percent >= self.below_percent {
            return Ok(());
        }

        let Some(item) = ctx.snapshot.find_consumable(&self.item_id) else {
            tracing::debug!(item = %self.item_id, "No healing item left");
            return Ok(());
        };

        self.api
            .use_consumable(&player.id, &item.user_item_id)
            .await?;
        tracing::info!(
            item = %item.name,
            hp = current,
            "Used {} at {}% health",
            item.name,
            percent
        );

        Ok(())
    }
}
