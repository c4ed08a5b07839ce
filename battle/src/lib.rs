//! Combat engine, position randomizer and lifecycle hooks for War of Walls.
//!
//! # Overview
//!
//! `walls-battle` sits between `walls-client` (HTTP calls) and the bot
//! strategies:
//!
//! ```text
//! walls-protocol (wire types)
//!        │
//!        ▼
//! walls-client (GameApi, token refresh)
//!        │
//!        ▼
//! walls-battle (combat engine + hooks) ← THIS CRATE
//!        │
//!        └─> walls-bot (supervised cycles)
//! ```
//!
//! # Main Types
//!
//! - [`CombatEngine`] - polls state and submits attacks until a battle ends
//! - [`AttackPositions`] / [`pick_attack_positions`] - one attack zone, two distinct defense zones
//! - [`HookRegistry`] - ordered handlers per [`HookEvent`]
//!
//! # Example Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use walls_battle::{CombatEngine, CombatTiming, HookRegistry};
//!
//! let engine = CombatEngine::new(api, Arc::new(HookRegistry::new()), CombatTiming::default());
//! engine.wait_for_battle().await?;
//! let summary = engine.run_battle().await?;
//! println!("Fought {} turns", summary.turns);
//! ```

pub mod engine;
pub mod error;
pub mod hooks;
pub mod positions;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use engine::{BattleSummary, CombatEngine, CombatTiming, select_target};
pub use error::{CombatError, HookError};
pub use hooks::{FnHook, Hook, HookContext, HookEvent, HookRegistry};
pub use positions::{
    AttackPositions, BodyZone, RangeError, pick_attack_positions, pick_attack_positions_with,
    random_in_range,
};
