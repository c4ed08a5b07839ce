//! CombatEngine - drives one battle from first poll to battle end

pub mod report;

use std::sync::Arc;
use std::time::Duration;

use walls_client::GameApi;
use walls_protocol::{ActiveBattle, AttackResponse, Participant, StateSnapshot};

use crate::error::CombatError;
use crate::hooks::{HookEvent, HookRegistry};
use crate::positions::{AttackPositions, pick_attack_positions};

/// Delays between combat requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatTiming {
    /// Pause after every resolved turn
    pub attack_delay: Duration,

    /// Poll interval while waiting for a battle to start
    pub battle_check_interval: Duration,

    /// Default rest period when health is too low to fight
    pub rest_interval: Duration,
}

impl CombatTiming {
    /// Wait before resubmitting an attack the opponent has not answered yet
    pub fn unresolved_backoff(&self) -> Duration {
        self.attack_delay * 2
    }
}

impl Default for CombatTiming {
    fn default() -> Self {
        Self {
            attack_delay: Duration::from_secs(1),
            battle_check_interval: Duration::from_secs(3),
            rest_interval: Duration::from_secs(5),
        }
    }
}

/// What happened over one call to [`CombatEngine::run_battle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BattleSummary {
    /// Attacks that got a response (resolved or rejected)
    pub turns: u32,

    /// Extra submissions caused by unresolved turns
    pub resubmissions: u32,

    /// Turns the server refused with `success: false`
    pub rejected: u32,

    pub target_defeated: bool,

    pub defeated: bool,
}

/// Turn-by-turn battle driver shared by every bot strategy
pub struct CombatEngine<C> {
    api: Arc<C>,
    hooks: Arc<HookRegistry>,
    timing: CombatTiming,
}

impl<C: GameApi> CombatEngine<C> {
    pub fn new(api: Arc<C>, hooks: Arc<HookRegistry>, timing: CombatTiming) -> Self {
        Self { api, hooks, timing }
    }

    pub fn timing(&self) -> &CombatTiming {
        &self.timing
    }

    /// Single poll of the battle flag
    pub async fn is_in_battle(&self) -> Result<bool, CombatError> {
        Ok(self.api.poll_state().await?.in_battle())
    }

    /// Poll on a fixed interval until a battle shows up. No upper bound.
    pub async fn wait_for_battle(&self) -> Result<StateSnapshot, CombatError> {
        tracing::info!("Waiting for battle to begin...");

        loop {
            tokio::time::sleep(self.timing.battle_check_interval).await;

            let snapshot = self.api.poll_state().await?;
            if snapshot.in_battle() {
                tracing::info!("Battle started!");
                return Ok(snapshot);
            }

            tracing::debug!("No battle detected, continuing to wait...");
        }
    }

    /// Fight until a poll reports the battle is over
    pub async fn run_battle(&self) -> Result<BattleSummary, CombatError> {
        tracing::info!("Entering combat!");

        let mut summary = BattleSummary::default();
        let mut first_turn = true;

        loop {
            let snapshot = self.api.poll_state().await?;

            let Some(battle) = snapshot.battle.active() else {
                tracing::info!(
                    turns = summary.turns,
                    resubmissions = summary.resubmissions,
                    "Battle ended!"
                );
                self.hooks
                    .fire(HookEvent::BattleEnded, &snapshot, None)
                    .await?;
                return Ok(summary);
            };

            if first_turn {
                self.hooks
                    .fire(HookEvent::BattleStarted, &snapshot, None)
                    .await?;
                first_turn = false;
            }

            let target = select_target(battle)?;

            self.hooks
                .fire(HookEvent::BeforeAttack, &snapshot, None)
                .await?;

            let positions = pick_attack_positions()?;
            summary.turns += 1;
            tracing::info!(
                battle = %battle.id,
                target = %target.id,
                "{}",
                report::describe_positions(summary.turns, &positions)
            );

            let (response, resubmissions) =
                self.submit_until_resolved(battle, target, &positions).await?;
            summary.resubmissions += resubmissions;

            match response.result() {
                Some(result) => {
                    report::log_turn(result, target.max_health, snapshot.player.health.max);
                    summary.target_defeated |= result.target_died;
                    summary.defeated |= result.you_died;
                }
                None => {
                    tracing::warn!(battle = %battle.id, "Attack was not accepted by the server");
                    summary.rejected += 1;
                }
            }

            self.hooks
                .fire(HookEvent::AfterAttack, &snapshot, Some(&response))
                .await?;

            tokio::time::sleep(self.timing.attack_delay).await;
        }
    }

    /// Submit the same attack until the opponent's action resolves the turn.
    ///
    /// There is no client-side cap: the server's turn deadline bounds the wait.
    async fn submit_until_resolved(
        &self,
        battle: &ActiveBattle,
        target: &Participant,
        positions: &AttackPositions,
    ) -> Result<(AttackResponse, u32), CombatError> {
        let mut resubmissions = 0;

        loop {
            let response = self
                .api
                .submit_attack(
                    &battle.id,
                    &target.id,
                    positions.attack_index(),
                    positions.defense_indices(),
                )
                .await?;

            if !response.is_unresolved() {
                return Ok((response, resubmissions));
            }

            tracing::debug!(battle = %battle.id, "Waiting for opponent to act");
            tokio::time::sleep(self.timing.unresolved_backoff()).await;
            resubmissions += 1;
        }
    }
}

/// First participant on a team other than ours
pub fn select_target(battle: &ActiveBattle) -> Result<&Participant, CombatError> {
    battle.first_opponent().ok_or_else(|| {
        tracing::error!(battle = %battle.id, "No target found in battle");
        CombatError::NoTarget {
            battle_id: battle.id.clone(),
        }
    })
}
