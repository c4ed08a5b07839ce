//! Arena queue responses

use serde::Deserialize;

/// Response to `POST /arena/queue/skip`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinBattleResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub battle: Option<QueuedBattle>,

    /// Whether the opponent is a recorded shadow rather than a live player
    #[serde(default)]
    pub is_shadow: bool,

    #[serde(default)]
    pub shadow_of: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedBattle {
    pub id: String,

    #[serde(rename = "type", default)]
    pub battle_type: String,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub current_turn: u32,

    #[serde(default)]
    pub turn_deadline: Option<String>,

    #[serde(default)]
    pub location_id: Option<String>,
}
