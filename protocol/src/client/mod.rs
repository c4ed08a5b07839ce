//! Outgoing requests
//!
//! Every call the bot makes is an [`Endpoint`] plus an optional JSON body.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP verb used by an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Endpoints exposed by the game API, relative to the API origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// POST login
    Login,
    /// GET sync
    Sync,
    /// POST travel/move
    Move,
    /// GET travel/destinations
    TravelDestinations,
    /// POST arena/queue
    JoinQueue,
    /// POST arena/queue/skip
    SkipQueue,
    /// POST combat/action
    CombatAction,
    /// POST player/stats
    AddStat,
    /// POST player/stats/reduce
    ReduceStat,
    /// POST shop/buy
    BuyItem,
    /// POST equipment/use-item
    UseItem,
    /// POST equipment/equip
    EquipItem,
}

impl Endpoint {
    /// Path relative to the API origin
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Sync => "sync",
            Self::Move => "travel/move",
            Self::TravelDestinations => "travel/destinations",
            Self::JoinQueue => "arena/queue",
            Self::SkipQueue => "arena/queue/skip",
            Self::CombatAction => "combat/action",
            Self::AddStat => "player/stats",
            Self::ReduceStat => "player/stats/reduce",
            Self::BuyItem => "shop/buy",
            Self::UseItem => "equipment/use-item",
            Self::EquipItem => "equipment/equip",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::Sync | Self::TravelDestinations => Method::Get,
            _ => Method::Post,
        }
    }

    /// Whether the request carries a bearer token
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login)
    }
}

/// A fully described request, replayable as-is after a token refresh
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Request without a body
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            body: None,
        }
    }

    /// Request with a JSON body
    pub fn with_body<T: Serialize>(endpoint: Endpoint, body: &T) -> serde_json::Result<Self> {
        Ok(Self {
            endpoint,
            body: Some(serde_json::to_value(body)?),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// The server expects the destination id as a string
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub destination_id: String,
}

impl MoveRequest {
    pub fn new(destination_id: u32) -> Self {
        Self {
            destination_id: destination_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackRequest<'a> {
    pub battle_id: &'a str,
    pub target_id: &'a str,
    pub attack_position: u8,
    pub defense_positions: [u8; 2],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueRequest {
    pub level_range: u32,
}

/// Player attributes that stat points can be moved between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStat {
    Strength,
    Dexterity,
    Vitality,
    Endurance,
    Luck,
    Wisdom,
}

impl PlayerStat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Dexterity => "dexterity",
            Self::Vitality => "vitality",
            Self::Endurance => "endurance",
            Self::Luck => "luck",
            Self::Wisdom => "wisdom",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatRequest {
    pub stat: PlayerStat,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyItemRequest<'a> {
    pub item_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UseItemRequest<'a> {
    pub target_id: &'a str,
    pub user_item_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipItemRequest<'a> {
    pub slot: &'a str,
    pub user_item_id: &'a str,
}
