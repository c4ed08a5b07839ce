use async_trait::async_trait;
use walls_protocol::{
    AttackResponse, JoinBattleResponse, PlayerStat, PlayerState, StateSnapshot, TravelDestinations,
};

use crate::error::ClientError;

/// Typed game operations the bot drives.
///
/// [`GameClient`](crate::GameClient) is the live implementation. The combat
/// engine and bot strategies only see this trait, so they can run against a
/// scripted implementation in tests.
///
/// # Example
///
/// ```ignore
/// let snapshot = api.poll_state().await?;
/// if !snapshot.in_battle() {
///     api.join_shadow_battle(5).await?;
/// }
/// ```
#[async_trait]
pub trait GameApi: Send + Sync {
    /// Fetch the full game state snapshot
    async fn poll_state(&self) -> Result<StateSnapshot, ClientError>;

    async fn move_to(&self, destination_id: u32) -> Result<(), ClientError>;

    async fn travel_destinations(&self) -> Result<TravelDestinations, ClientError>;

    async fn submit_attack(
        &self,
        battle_id: &str,
        target_id: &str,
        attack_position: u8,
        defense_positions: [u8; 2],
    ) -> Result<AttackResponse, ClientError>;

    /// Join the arena queue. Being queued already is not an error.
    async fn enter_matchmaking_queue(&self, level_range: u32) -> Result<(), ClientError>;

    /// Skip the queue wait and get matched against a shadow opponent
    async fn leave_queue_immediately(&self) -> Result<JoinBattleResponse, ClientError>;

    async fn use_consumable(&self, target_id: &str, user_item_id: &str) -> Result<(), ClientError>;

    async fn allocate_stat_point(&self, stat: PlayerStat) -> Result<(), ClientError>;

    async fn reduce_stat_point(&self, stat: PlayerStat) -> Result<(), ClientError>;

    async fn buy_item(&self, item_id: &str) -> Result<(), ClientError>;

    async fn equip_item(&self, slot: &str, user_item_id: &str) -> Result<(), ClientError>;

    /// Enqueue and skip the wait in one go
    async fn join_shadow_battle(
        &self,
        level_range: u32,
    ) -> Result<JoinBattleResponse, ClientError> {
        self.enter_matchmaking_queue(level_range).await?;
        self.leave_queue_immediately().await
    }

    async fn player_state(&self) -> Result<PlayerState, ClientError> {
        let snapshot = self.poll_state().await?;
        Ok(PlayerState::from(&snapshot))
    }
}
