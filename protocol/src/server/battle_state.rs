//! Battle sub-state of a snapshot
//!
//! On the wire this is `{"inBattle": false}` or `{"inBattle": true, ...}`.
//! Serde cannot tag on a boolean, so decoding goes through [`RawBattle`].

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::ParseError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawBattle")]
pub enum BattleState {
    NotInBattle,
    InBattle(ActiveBattle),
}

impl BattleState {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::InBattle(_))
    }

    pub fn active(&self) -> Option<&ActiveBattle> {
        match self {
            Self::InBattle(battle) => Some(battle),
            Self::NotInBattle => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBattle {
    in_battle: bool,
    #[serde(flatten)]
    details: Map<String, Value>,
}

impl TryFrom<RawBattle> for BattleState {
    type Error = ParseError;

    fn try_from(raw: RawBattle) -> Result<Self, Self::Error> {
        if !raw.in_battle {
            return Ok(Self::NotInBattle);
        }

        let battle: ActiveBattle = serde_json::from_value(Value::Object(raw.details))
            .map_err(|e| ParseError::InvalidFormat(format!("battle: {e}")))?;

        if battle.participants.is_empty() {
            return Err(ParseError::EmptyBattle(battle.id));
        }

        Ok(Self::InBattle(battle))
    }
}

/// A battle the player is currently part of
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveBattle {
    pub id: String,

    /// Battle kind as reported by the server (pvp, pve, ...)
    #[serde(rename = "type", default)]
    pub battle_type: String,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub current_turn: u32,

    #[serde(default)]
    pub is_player_turn: bool,

    #[serde(default)]
    pub turn_deadline: Option<String>,

    /// Team the polling player fights for
    pub my_team: u32,

    pub participants: Vec<Participant>,
}

impl ActiveBattle {
    /// First participant that is not on our team
    pub fn first_opponent(&self) -> Option<&Participant> {
        self.participants.iter().find(|p| p.team != self.my_team)
    }

    /// Our own participant entry
    pub fn me(&self) -> Option<&Participant> {
        self.participants.iter().find(|p| p.is_current_user)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,

    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub level: u32,

    pub health: i32,

    pub max_health: i32,

    #[serde(default)]
    pub total_damage_dealt: i64,

    #[serde(default)]
    pub is_monster: bool,

    pub team: u32,

    #[serde(default)]
    pub is_current_user: bool,
}
