use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::Instrument;
use walls_battle::HookEvent;
use walls_client::GameApi;

use super::require_positive;
use crate::context::BotContext;
use crate::error::BotError;
use crate::status::CycleStatus;
use crate::strategy::Strategy;

/// Pause taken instead of queueing when health is below the minimum
const LOW_HEALTH_PAUSE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
pub struct ShadowPvpOptions {
    /// Below this HP the bot rests instead of queueing
    pub min_health: i32,

    /// Level spread accepted by matchmaking
    pub level_range: u32,

    /// If set, stay in the real queue this long before falling back to a
    /// shadow opponent. Otherwise skip the queue straight away.
    pub entry_delay: Option<Duration>,
}

impl Default for ShadowPvpOptions {
    fn default() -> Self {
        Self {
            min_health: 100,
            level_range: 2,
            entry_delay: None,
        }
    }
}

/// Arena fights against shadow copies of other players
pub struct ShadowPvp {
    options: ShadowPvpOptions,
    pending_skip: Option<JoinHandle<()>>,
}

impl ShadowPvp {
    pub fn new(options: ShadowPvpOptions) -> Result<Self, BotError> {
        require_positive(options.min_health, "min_health")?;
        if options.level_range == 0 {
            return Err(BotError::InvalidConfig(
                "level_range must be positive".to_string(),
            ));
        }

        Ok(Self {
            options,
            pending_skip: None,
        })
    }

    pub fn options(&self) -> &ShadowPvpOptions {
        &self.options
    }

    async fn enter_battle<C: GameApi + 'static>(
        &mut self,
        ctx: &BotContext<C>,
    ) -> Result<(), BotError> {
        let level_range = self.options.level_range;
        tracing::info!(level_range, "Entering Shadow PvP battle...");

        match self.options.entry_delay {
            None => {
                let response = ctx.api().join_shadow_battle(level_range).await?;
                tracing::info!(
                    status = %response.status,
                    shadow = response.is_shadow,
                    "Skipped queue, shadow battle requested"
                );
            }
            Some(delay) => {
                ctx.api().enter_matchmaking_queue(level_range).await?;
                tracing::info!(
                    "Queued, falling back to a shadow opponent in {} seconds",
                    delay.as_secs_f64()
                );

                if let Some(stale) = self.pending_skip.take() {
                    stale.abort();
                }
                let api = ctx.api().clone();
                self.pending_skip = Some(tokio::spawn(
                    skip_queue_if_idle(api, delay).instrument(tracing::Span::current()),
                ));
            }
        }

        Ok(())
    }
}

/// After `delay`, skip the queue unless a battle already started.
///
/// Best effort: failures are logged and never reach the bot loop.
pub async fn skip_queue_if_idle<C: GameApi>(api: Arc<C>, delay: Duration) {
    tokio::time::sleep(delay).await;

    match api.poll_state().await {
        Ok(snapshot) if snapshot.in_battle() => {
            tracing::debug!("Battle already started, not skipping the queue");
        }
        Ok(_) => match api.leave_queue_immediately().await {
            Ok(_) => tracing::info!("Queue wait over, skipped to a shadow opponent"),
            Err(e) => tracing::warn!(error = %e, "Failed to skip the queue"),
        },
        Err(e) => tracing::warn!(error = %e, "Failed to check battle state before skipping"),
    }
}

#[async_trait]
impl<C: GameApi + 'static> Strategy<C> for ShadowPvp {
    fn name(&self) -> &'static str {
        "Shadow PvP"
    }

    async fn execute_cycle(&mut self, ctx: &mut BotContext<C>) -> Result<(), BotError> {
        let cycle = ctx.begin_cycle();
        tracing::info!(cycle, "Starting Shadow PvP cycle #{}", cycle);

        let snapshot = ctx.api().poll_state().await?;
        ctx.fire(HookEvent::CycleStarted, &snapshot).await?;

        // hooks may have changed health, so look again
        let state = ctx.api().player_state().await?;

        if !state.in_battle && state.health.current < self.options.min_health {
            tracing::warn!(
                hp = state.health.current,
                max_hp = state.health.max,
                "Health too low for Shadow PvP ({}/{} HP), waiting...",
                state.health.current,
                state.health.max
            );
            ctx.set_status(CycleStatus::Resting);
            tokio::time::sleep(LOW_HEALTH_PAUSE).await;
            return Ok(());
        }

        if state.in_battle {
            tracing::warn!("Already in battle! Jumping straight to attack loop...");
            ctx.fight().await?;
        } else {
            self.enter_battle(ctx).await?;
            ctx.wait_and_fight().await?;
        }

        tracing::info!(cycle, "Shadow PvP cycle #{} complete!", cycle);
        let snapshot = ctx.api().poll_state().await?;
        ctx.fire(HookEvent::CycleCompleted, &snapshot).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use walls_battle::testing::{ApiCall, ScriptedApi, battle_snapshot, idle_snapshot};
    use walls_battle::{CombatTiming, HookRegistry};

    fn context(api: &Arc<ScriptedApi>) -> BotContext<ScriptedApi> {
        BotContext::new(api.clone(), HookRegistry::new(), CombatTiming::default())
    }

    fn shadow(entry_delay: Option<Duration>) -> ShadowPvp {
        ShadowPvp::new(ShadowPvpOptions {
            min_health: 100,
            level_range: 5,
            entry_delay,
        })
        .unwrap()
    }

    fn is_queue_call(call: &ApiCall) -> bool {
        matches!(call, ApiCall::EnterQueue(_) | ApiCall::SkipQueue)
    }

    #[tokio::test(start_paused = true)]
    async fn test_low_health_never_queues() {
        let api = Arc::new(ScriptedApi::new());
        api.push_state(idle_snapshot(60, 300));
        let mut ctx = context(&api);
        let mut strategy = shadow(None);

        let start = tokio::time::Instant::now();
        strategy.execute_cycle(&mut ctx).await.unwrap();

        assert_eq!(api.count(is_queue_call), 0);
        assert_eq!(api.attack_count(), 0);
        assert!(start.elapsed() >= LOW_HEALTH_PAUSE);
        assert_eq!(ctx.status(), CycleStatus::Resting);
    }

    #[tokio::test(start_paused = true)]
    async fn test_low_health_in_battle_still_fights() {
        let api = Arc::new(ScriptedApi::new());
        api.push_state(battle_snapshot("b-1", 40));
        api.push_state(battle_snapshot("b-1", 40));
        api.push_state(battle_snapshot("b-1", 40));
        api.push_state(idle_snapshot(30, 300));
        let mut ctx = context(&api);
        let mut strategy = shadow(None);

        strategy.execute_cycle(&mut ctx).await.unwrap();

        assert_eq!(api.count(is_queue_call), 0);
        assert_eq!(api.attack_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_healthy_cycle_skips_queue_and_fights() {
        let api = Arc::new(ScriptedApi::new());
        api.push_state(idle_snapshot(300, 300));
        api.push_state(idle_snapshot(300, 300));
        api.push_state(battle_snapshot("b-1", 300));
        api.push_state(battle_snapshot("b-1", 300));
        api.push_state(idle_snapshot(250, 300));
        let mut ctx = context(&api);
        let mut strategy = shadow(None);

        strategy.execute_cycle(&mut ctx).await.unwrap();

        let calls = api.calls();
        let enter = calls.iter().position(|c| c == &ApiCall::EnterQueue(5));
        let skip = calls.iter().position(|c| c == &ApiCall::SkipQueue);
        assert!(enter.is_some() && skip.is_some());
        assert!(enter < skip);
        assert_eq!(api.attack_count(), 1);
        assert_eq!(ctx.cycle_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_delay_defers_skip() {
        let api = Arc::new(ScriptedApi::new());
        api.push_state(idle_snapshot(300, 300));
        api.push_state(idle_snapshot(300, 300));
        api.push_state(battle_snapshot("b-1", 300));
        api.push_state(battle_snapshot("b-1", 300));
        api.push_state(idle_snapshot(250, 300));
        let mut ctx = context(&api);
        let mut strategy = shadow(Some(Duration::from_secs(60)));

        strategy.execute_cycle(&mut ctx).await.unwrap();

        assert!(api.called(&ApiCall::EnterQueue(5)));
        assert!(!api.called(&ApiCall::SkipQueue));
        assert_eq!(api.attack_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_queue_if_idle() {
        let api = Arc::new(ScriptedApi::new());
        api.push_state(idle_snapshot(300, 300));

        skip_queue_if_idle(api.clone(), Duration::from_secs(10)).await;

        assert!(api.called(&ApiCall::SkipQueue));
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_queue_not_needed_in_battle() {
        let api = Arc::new(ScriptedApi::new());
        api.push_state(battle_snapshot("b-1", 300));

        skip_queue_if_idle(api.clone(), Duration::from_secs(10)).await;

        assert!(!api.called(&ApiCall::SkipQueue));
        assert_eq!(api.poll_count(), 1);
    }

    #[test]
    fn test_invalid_options() {
        let result = ShadowPvp::new(ShadowPvpOptions {
            min_health: 0,
            ..Default::default()
        });
        assert!(matches!(result, Err(BotError::InvalidConfig(_))));

        let result = ShadowPvp::new(ShadowPvpOptions {
            level_range: 0,
            ..Default::default()
        });
        assert!(matches!(result, Err(BotError::InvalidConfig(_))));
    }
}
