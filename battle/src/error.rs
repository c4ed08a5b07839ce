use thiserror::Error;
use walls_client::ClientError;

use crate::hooks::HookEvent;
use crate::positions::RangeError;

/// A lifecycle hook returned an error
#[derive(Error, Debug)]
#[error("{event} hook failed: {source}")]
pub struct HookError {
    pub event: HookEvent,
    #[source]
    pub source: anyhow::Error,
}

#[derive(Error, Debug)]
pub enum CombatError {
    /// The battle listed nobody on another team
    #[error("No target found in battle {battle_id}")]
    NoTarget { battle_id: String },

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Hook(#[from] HookError),
}
