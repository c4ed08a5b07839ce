use thiserror::Error;
use walls_battle::{CombatError, HookError};
use walls_client::ClientError;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Invalid bot configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Hook(#[from] HookError),
}
