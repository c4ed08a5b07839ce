mod attack;
mod battle_state;
mod queue;
mod snapshot;
mod travel;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ParseError;

pub use attack::{AttackOutcome, AttackResponse, AttackResult, HitReport, Waiting};
pub use battle_state::{ActiveBattle, BattleState, Participant};
pub use queue::{JoinBattleResponse, QueuedBattle};
pub use snapshot::{
    Consumables, Health, Location, Player, PlayerState, StateSnapshot, UserItem, percent_of,
};
pub use travel::{TravelDestination, TravelDestinations};

/// Body of a successful login
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Body the server sends alongside a non-2xx status
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Decode a JSON response body into a typed payload
pub fn decode<T: DeserializeOwned>(body: Value) -> Result<T, ParseError> {
    serde_json::from_value(body).map_err(|e| ParseError::InvalidFormat(e.to_string()))
}

/// Parse a raw `/sync` body
pub fn parse_snapshot(text: &str) -> Result<StateSnapshot, ParseError> {
    serde_json::from_str(text).map_err(|e| ParseError::InvalidFormat(e.to_string()))
}

/// Extract the server-reported reason from an error body, if any
pub fn parse_error_message(body: &Value) -> Option<String> {
    ErrorBody::deserialize(body).ok()?.message
}
