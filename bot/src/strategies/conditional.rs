use std::time::Duration;

use async_trait::async_trait;
use walls_client::GameApi;
use walls_protocol::StateSnapshot;

use super::require_path;
use crate::context::BotContext;
use crate::error::BotError;
use crate::status::CycleStatus;
use crate::strategy::Strategy;

/// Predicate over the current snapshot; all must hold before heading out
pub type BattleCondition = Box<dyn Fn(&StateSnapshot) -> bool + Send + Sync>;

const UNMET_BACKOFF: Duration = Duration::from_secs(30);

/// Fight at `target_path` only while every condition holds
pub struct Conditional {
    target_path: Vec<u32>,
    conditions: Vec<BattleCondition>,
}

impl Conditional {
    pub fn new(target_path: Vec<u32>) -> Result<Self, BotError> {
        require_path(&target_path, "target_path")?;
        Ok(Self {
            target_path,
            conditions: Vec::new(),
        })
    }

    pub fn with_condition<F>(mut self, condition: F) -> Self
    where
        F: Fn(&StateSnapshot) -> bool + Send + Sync + 'static,
    {
        self.conditions.push(Box::new(condition));
        self
    }

    fn conditions_met(&self, snapshot: &StateSnapshot) -> bool {
        self.conditions.iter().all(|condition| condition(snapshot))
    }
}

#[async_trait]
impl<C: GameApi + 'static> Strategy<C> for Conditional {
    fn name(&self) -> &'static str {
        "Conditional"
    }

    async fn execute_cycle(&mut self, ctx: &mut BotContext<C>) -> Result<(), BotError> {
        let cycle = ctx.begin_cycle();
        tracing::info!(cycle, "Starting conditional cycle #{}", cycle);

        let snapshot = ctx.api().poll_state().await?;
        if !self.conditions_met(&snapshot) {
            tracing::warn!("Battle conditions not met, waiting...");
            ctx.set_status(CycleStatus::Waiting);
            tokio::time::sleep(UNMET_BACKOFF).await;
            return Ok(());
        }

        tracing::info!("Battle conditions met, proceeding...");
        ctx.travel_path(&self.target_path, "Heading to battle").await?;
        ctx.wait_and_fight().await?;

        Ok(())
    }

    fn error_cooldown(&self) -> Duration {
        Duration::from_secs(10)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use walls_battle::testing::{ScriptedApi, battle_snapshot, idle_snapshot};
    use walls_battle::{CombatTiming, HookRegistry};

    fn context(api: &Arc<ScriptedApi>) -> BotContext<ScriptedApi> {
        BotContext::new(api.clone(), HookRegistry::new(), CombatTiming::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmet_condition_waits() {
        let api = Arc::new(ScriptedApi::new());
        api.push_state(idle_snapshot(100, 300));
        let mut ctx = context(&api);
        let mut strategy = Conditional::new(vec![7])
            .unwrap()
            .with_condition(|s| s.player.health.percent() > 80);

        let start = tokio::time::Instant::now();
        strategy.execute_cycle(&mut ctx).await.unwrap();

        assert!(api.calls().iter().all(|c| *c == walls_battle::testing::ApiCall::PollState));
        assert!(start.elapsed() >= UNMET_BACKOFF);
        assert_eq!(ctx.status(), CycleStatus::Waiting);
    }

    #[tokio::test(start_paused = true)]
    async fn test_met_conditions_fight() {
        let api = Arc::new(ScriptedApi::new());
        api.push_state(idle_snapshot(300, 300));
        api.push_state(battle_snapshot("b-1", 300));
        api.push_state(battle_snapshot("b-1", 300));
        api.push_state(idle_snapshot(300, 300));
        let mut ctx = context(&api);
        let mut strategy = Conditional::new(vec![7])
            .unwrap()
            .with_condition(|s| s.player.health.current == s.player.health.max);

        strategy.execute_cycle(&mut ctx).await.unwrap();

        assert_eq!(api.attack_count(), 1);
    }
}
