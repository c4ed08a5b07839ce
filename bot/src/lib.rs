//! Bot cycle controller for War of Walls.
//!
//! A [`Bot`] pairs a [`Strategy`] with a [`BotContext`] and repeats the
//! strategy's cycle forever. A failed cycle is logged, the status is set to
//! [`CycleStatus::Error`], and the bot retries after a cooldown.
//!
//! # Strategies
//!
//! - [`ShadowPvp`] - queue in the arena and fight shadow opponents
//! - [`Pve`] - travel to a hunting ground, fight, travel back
//! - [`Patrol`] - walk a rotation of routes, fighting on encounter
//! - [`Rest`] - go to a safe spot and wait
//! - [`Conditional`] - fight only while predicates over the state hold
//!
//! # Example Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use walls_battle::{CombatTiming, HookRegistry};
//! use walls_bot::{Bot, BotContext, ShadowPvp, ShadowPvpOptions};
//! use walls_client::GameClient;
//!
//! let api = Arc::new(GameClient::login("knight", "hunter2").await?);
//! let ctx = BotContext::new(api, HookRegistry::new(), CombatTiming::default());
//! let strategy = ShadowPvp::new(ShadowPvpOptions::default())?;
//!
//! Bot::new(ctx, strategy).run_forever().await;
//! ```

pub mod config;
mod context;
mod error;
mod heal;
mod runner;
mod status;
pub mod strategies;
mod strategy;

pub use config::{AccountConfig, BotConfig, ConfigError, StrategyConfig, TimingConfig};
pub use context::{BotContext, HealthCheck};
pub use error::BotError;
pub use heal::HealOnLowHealth;
pub use runner::Bot;
pub use status::CycleStatus;
pub use strategies::{
    BattleCondition, Conditional, Patrol, Pve, PveOptions, Rest, ShadowPvp, ShadowPvpOptions,
};
pub use strategy::{DEFAULT_ERROR_COOLDOWN, Strategy};
