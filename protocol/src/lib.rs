use thiserror::Error;

pub mod client;
pub mod server;

pub use client::{
    ApiRequest, AttackRequest, BuyItemRequest, EquipItemRequest, Endpoint, LoginRequest, Method,
    MoveRequest, PlayerStat, QueueRequest, StatRequest, UseItemRequest,
};
pub use server::{
    ActiveBattle, AttackOutcome, AttackResponse, AttackResult, BattleState, Consumables,
    ErrorBody, Health, HitReport, JoinBattleResponse, Location, LoginResponse, Participant, Player,
    PlayerState, QueuedBattle, StateSnapshot, TravelDestination, TravelDestinations, UserItem,
    Waiting, decode, parse_error_message, parse_snapshot, percent_of,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Invalid payload: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Battle {0} reported no participants")]
    EmptyBattle(String),
}
