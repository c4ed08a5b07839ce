//! Scripted [`GameApi`] for exercising engines and bots without a server
//!
//! Enabled for this crate's tests and, through the `test-util` feature, for
//! downstream crates' tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use walls_client::{ClientError, GameApi};
use walls_protocol::{
    ActiveBattle, AttackResponse, AttackResult, BattleState, Consumables, Health, HitReport,
    JoinBattleResponse, Location, Participant, Player, PlayerStat, StateSnapshot,
    TravelDestinations, UserItem, Waiting,
};

/// Every call the scripted API received, in order
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    PollState,
    Move(u32),
    TravelDestinations,
    Attack {
        battle_id: String,
        target_id: String,
        attack: u8,
        defense: [u8; 2],
    },
    EnterQueue(u32),
    SkipQueue,
    UseConsumable {
        target_id: String,
        user_item_id: String,
    },
    AllocateStat(PlayerStat),
    ReduceStat(PlayerStat),
    BuyItem(String),
    EquipItem {
        slot: String,
        user_item_id: String,
    },
}

/// Replays queued snapshots and attack responses.
///
/// Once the snapshot script runs out, the last snapshot handed out is
/// repeated. Once the attack script runs out, every attack resolves with
/// zero damage.
#[derive(Default)]
pub struct ScriptedApi {
    states: Mutex<VecDeque<Result<StateSnapshot, ClientError>>>,
    last_state: Mutex<Option<StateSnapshot>>,
    attacks: Mutex<VecDeque<AttackResponse>>,
    calls: Mutex<Vec<ApiCall>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_state(&self, snapshot: StateSnapshot) {
        self.states.lock().unwrap().push_back(Ok(snapshot));
    }

    /// Make a poll fail at this point in the script
    pub fn push_error(&self, error: ClientError) {
        self.states.lock().unwrap().push_back(Err(error));
    }

    pub fn push_attack(&self, response: AttackResponse) {
        self.attacks.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, call: &ApiCall) -> bool {
        self.calls.lock().unwrap().contains(call)
    }

    pub fn count(&self, predicate: impl Fn(&ApiCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    pub fn poll_count(&self) -> usize {
        self.count(|c| *c == ApiCall::PollState)
    }

    pub fn attack_count(&self) -> usize {
        self.count(|c| matches!(c, ApiCall::Attack { .. }))
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl GameApi for ScriptedApi {
    async fn poll_state(&self) -> Result<StateSnapshot, ClientError> {
        self.record(ApiCall::PollState);

        let next = self.states.lock().unwrap().pop_front();
        match next {
            Some(Ok(snapshot)) => {
                *self.last_state.lock().unwrap() = Some(snapshot.clone());
                Ok(snapshot)
            }
            Some(Err(error)) => Err(error),
            None => self
                .last_state
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| ClientError::Network("no scripted state".to_string())),
        }
    }

    async fn move_to(&self, destination_id: u32) -> Result<(), ClientError> {
        self.record(ApiCall::Move(destination_id));
        Ok(())
    }

    async fn travel_destinations(&self) -> Result<TravelDestinations, ClientError> {
        self.record(ApiCall::TravelDestinations);
        Ok(TravelDestinations {
            destinations: Vec::new(),
            current_location: Location::default(),
        })
    }

    async fn submit_attack(
        &self,
        battle_id: &str,
        target_id: &str,
        attack_position: u8,
        defense_positions: [u8; 2],
    ) -> Result<AttackResponse, ClientError> {
        self.record(ApiCall::Attack {
            battle_id: battle_id.to_string(),
            target_id: target_id.to_string(),
            attack: attack_position,
            defense: defense_positions,
        });
        let next = self.attacks.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| resolved(0, 0)))
    }

    async fn enter_matchmaking_queue(&self, level_range: u32) -> Result<(), ClientError> {
        self.record(ApiCall::EnterQueue(level_range));
        Ok(())
    }

    async fn leave_queue_immediately(&self) -> Result<JoinBattleResponse, ClientError> {
        self.record(ApiCall::SkipQueue);
        Ok(JoinBattleResponse {
            success: true,
            status: "matched".to_string(),
            message: String::new(),
            battle: None,
            is_shadow: true,
            shadow_of: None,
        })
    }

    async fn use_consumable(&self, target_id: &str, user_item_id: &str) -> Result<(), ClientError> {
        self.record(ApiCall::UseConsumable {
            target_id: target_id.to_string(),
            user_item_id: user_item_id.to_string(),
        });
        Ok(())
    }

    async fn allocate_stat_point(&self, stat: PlayerStat) -> Result<(), ClientError> {
        self.record(ApiCall::AllocateStat(stat));
        Ok(())
    }

    async fn reduce_stat_point(&self, stat: PlayerStat) -> Result<(), ClientError> {
        self.record(ApiCall::ReduceStat(stat));
        Ok(())
    }

    async fn buy_item(&self, item_id: &str) -> Result<(), ClientError> {
        self.record(ApiCall::BuyItem(item_id.to_string()));
        Ok(())
    }

    async fn equip_item(&self, slot: &str, user_item_id: &str) -> Result<(), ClientError> {
        self.record(ApiCall::EquipItem {
            slot: slot.to_string(),
            user_item_id: user_item_id.to_string(),
        });
        Ok(())
    }
}

fn player(current: i32, max: i32) -> Player {
    Player {
        id: "player-1".to_string(),
        username: "knight".to_string(),
        health: Health {
            current,
            max,
            percentage: 0.0,
        },
        energy: 100,
        max_energy: 100,
        level: 10,
        gold: 0,
        stat_points: 0,
        location: None,
    }
}

/// Player outside of any battle
pub fn idle_snapshot(current: i32, max: i32) -> StateSnapshot {
    StateSnapshot {
        player: player(current, max),
        battle: BattleState::NotInBattle,
        consumables: Consumables::default(),
    }
}

/// Player (team 1) fighting one opponent (team 2) named `enemy-1`
pub fn battle_snapshot(battle_id: &str, current: i32) -> StateSnapshot {
    StateSnapshot {
        player: player(current, 300),
        battle: BattleState::InBattle(ActiveBattle {
            id: battle_id.to_string(),
            battle_type: "pvp".to_string(),
            status: "active".to_string(),
            current_turn: 1,
            is_player_turn: true,
            turn_deadline: None,
            my_team: 1,
            participants: vec![participant("me", 1, true), participant("enemy-1", 2, false)],
        }),
        consumables: Consumables::default(),
    }
}

pub fn participant(id: &str, team: u32, is_current_user: bool) -> Participant {
    Participant {
        id: id.to_string(),
        user_id: None,
        name: Some(id.to_string()),
        level: 10,
        health: 200,
        max_health: 200,
        total_damage_dealt: 0,
        is_monster: !is_current_user && team != 1,
        team,
        is_current_user,
    }
}

/// Add an owned consumable to a snapshot
pub fn with_consumable(
    mut snapshot: StateSnapshot,
    item_id: &str,
    user_item_id: &str,
) -> StateSnapshot {
    snapshot
        .consumables
        .unequipped
        .get_or_insert_with(Vec::new)
        .push(UserItem {
            id: item_id.to_string(),
            user_item_id: user_item_id.to_string(),
            name: item_id.to_string(),
            slot: None,
        });
    snapshot
}

pub fn resolved(target_health: i32, your_health: i32) -> AttackResponse {
    AttackResponse::resolved(AttackResult {
        you_dealt: HitReport {
            damage: 10,
            ..Default::default()
        },
        you_received: HitReport::default(),
        target_health,
        your_health,
        target_died: target_health <= 0,
        ..Default::default()
    })
}

pub fn unresolved() -> AttackResponse {
    AttackResponse::unresolved(Waiting {
        target_id: "enemy-1".to_string(),
        target_name: "Enemy".to_string(),
        deadline: None,
    })
}
