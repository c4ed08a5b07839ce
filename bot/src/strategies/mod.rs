//! Built-in bot strategies

mod conditional;
mod patrol;
mod pve;
mod rest;
mod shadow;

pub use conditional::{BattleCondition, Conditional};
pub use patrol::Patrol;
pub use pve::{Pve, PveOptions};
pub use rest::{DEFAULT_REST_DURATION, Rest};
pub use shadow::{ShadowPvp, ShadowPvpOptions, skip_queue_if_idle};

use crate::error::BotError;

fn require_path(path: &[u32], what: &str) -> Result<(), BotError> {
    if path.is_empty() {
        return Err(BotError::InvalidConfig(format!("{what} must not be empty")));
    }
    Ok(())
}

fn require_positive(value: i32, what: &str) -> Result<(), BotError> {
    if value <= 0 {
        return Err(BotError::InvalidConfig(format!(
            "{what} must be positive, got {value}"
        )));
    }
    Ok(())
}
