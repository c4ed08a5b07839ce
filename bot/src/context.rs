//! State shared by every strategy of one bot

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use walls_battle::{BattleSummary, CombatEngine, CombatTiming, HookEvent, HookRegistry};
use walls_client::GameApi;
use walls_protocol::{StateSnapshot, percent_of};

use crate::error::BotError;
use crate::status::CycleStatus;

/// Result of a health gate
#[derive(Debug, Clone)]
pub struct HealthCheck {
    pub has_enough_health: bool,
    pub current: i32,
    pub max: i32,
    pub in_battle: bool,
    pub snapshot: StateSnapshot,
}

/// Client, hooks, combat engine, status and cycle counter of one bot.
///
/// Strategies get it by `&mut` for the duration of a cycle.
pub struct BotContext<C> {
    api: Arc<C>,
    hooks: Arc<HookRegistry>,
    combat: CombatEngine<C>,
    status: watch::Sender<CycleStatus>,
    cycle_count: u64,
}

impl<C: GameApi> BotContext<C> {
    pub fn new(api: Arc<C>, hooks: HookRegistry, timing: CombatTiming) -> Self {
        let hooks = Arc::new(hooks);
        let combat = CombatEngine::new(api.clone(), hooks.clone(), timing);
        let (status, _) = watch::channel(CycleStatus::Idle);

        Self {
            api,
            hooks,
            combat,
            status,
            cycle_count: 0,
        }
    }

    pub fn api(&self) -> &Arc<C> {
        &self.api
    }

    pub fn combat(&self) -> &CombatEngine<C> {
        &self.combat
    }

    pub fn timing(&self) -> &CombatTiming {
        self.combat.timing()
    }

    pub fn status(&self) -> CycleStatus {
        *self.status.borrow()
    }

    pub fn set_status(&self, status: CycleStatus) {
        self.status.send_replace(status);
    }

    /// Receiver that observes every status change
    pub fn subscribe(&self) -> watch::Receiver<CycleStatus> {
        self.status.subscribe()
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Bump the cycle counter and reset status to idle
    pub fn begin_cycle(&mut self) -> u64 {
        self.cycle_count += 1;
        self.set_status(CycleStatus::Idle);
        self.cycle_count
    }

    pub async fn fire(&self, event: HookEvent, snapshot: &StateSnapshot) -> Result<(), BotError> {
        self.hooks.fire(event, snapshot, None).await?;
        Ok(())
    }

    /// Poll and compare current health against `min_health`
    pub async fn check_health(&self, min_health: i32) -> Result<HealthCheck, BotError> {
        let snapshot = self.api.poll_state().await?;
        let health = snapshot.player.health;
        let percent = percent_of(health.current, health.max);

        let has_enough_health = health.current >= min_health;
        if has_enough_health {
            tracing::info!(
                hp = health.current,
                max_hp = health.max,
                "Health check passed: {}/{} HP ({}%)",
                health.current,
                health.max,
                percent
            );
        } else {
            tracing::warn!(
                hp = health.current,
                max_hp = health.max,
                min_health,
                "Low health: {}/{} HP ({}%) - minimum required: {}",
                health.current,
                health.max,
                percent,
                min_health
            );
        }

        Ok(HealthCheck {
            has_enough_health,
            current: health.current,
            max: health.max,
            in_battle: snapshot.in_battle(),
            snapshot,
        })
    }

    pub async fn rest(&self, duration: Duration) {
        self.set_status(CycleStatus::Resting);
        tracing::info!("Resting for {} seconds...", duration.as_secs_f64());
        tokio::time::sleep(duration).await;
    }

    /// Move through each destination in order
    pub async fn travel_path(&self, path: &[u32], description: &str) -> Result<(), BotError> {
        self.set_status(CycleStatus::Traveling);
        tracing::info!(stops = path.len(), "{} ({} locations)", description, path.len());

        for (i, destination) in path.iter().enumerate() {
            self.api.move_to(*destination).await?;
            tracing::info!(
                destination,
                "Moving to location {} ({}/{})",
                destination,
                i + 1,
                path.len()
            );
        }

        tracing::info!("Arrived at destination");
        Ok(())
    }

    /// Run the attack loop of the battle we are already in
    pub async fn fight(&self) -> Result<BattleSummary, BotError> {
        self.set_status(CycleStatus::Attacking);
        Ok(self.combat.run_battle().await?)
    }

    /// Wait until a battle starts, then fight it
    pub async fn wait_and_fight(&self) -> Result<BattleSummary, BotError> {
        self.set_status(CycleStatus::Waiting);
        self.combat.wait_for_battle().await?;
        self.fight().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use walls_battle::testing::{ApiCall, ScriptedApi, idle_snapshot};

    fn context(api: &Arc<ScriptedApi>) -> BotContext<ScriptedApi> {
        BotContext::new(api.clone(), HookRegistry::new(), CombatTiming::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_health() {
        let api = Arc::new(ScriptedApi::new());
        api.push_state(idle_snapshot(120, 300));
        let ctx = context(&api);

        let check = ctx.check_health(130).await.unwrap();
        assert!(!check.has_enough_health);
        assert_eq!((check.current, check.max), (120, 300));

        let check = ctx.check_health(120).await.unwrap();
        assert!(check.has_enough_health);
        assert!(!check.in_battle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_travel_path_in_order() {
        let api = Arc::new(ScriptedApi::new());
        let ctx = context(&api);

        ctx.travel_path(&[10, 11, 28], "Starting journey to target")
            .await
            .unwrap();

        assert_eq!(
            api.calls(),
            vec![ApiCall::Move(10), ApiCall::Move(11), ApiCall::Move(28)]
        );
        assert_eq!(ctx.status(), CycleStatus::Traveling);
    }

    #[tokio::test(start_paused = true)]
    async fn test_begin_cycle_and_subscribe() {
        let api = Arc::new(ScriptedApi::new());
        let mut ctx = context(&api);
        let mut status = ctx.subscribe();

        ctx.rest(Duration::from_secs(5)).await;
        assert!(status.has_changed().unwrap());
        assert_eq!(*status.borrow_and_update(), CycleStatus::Resting);

        assert_eq!(ctx.begin_cycle(), 1);
        assert_eq!(ctx.begin_cycle(), 2);
        assert_eq!(ctx.cycle_count(), 2);
        assert_eq!(*status.borrow_and_update(), CycleStatus::Idle);
    }
}
