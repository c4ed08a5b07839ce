//! TOML configuration for a fleet of bots
//!
//! ```toml
//! base_url = "https://api.knights-il.com/api"
//!
//! [timing]
//! attack_delay_ms = 1000
//!
//! [[account]]
//! name = "hunter"
//! username = "knight"
//! password = "hunter2"
//! heal_item = "potion-small"
//!
//! [account.strategy]
//! kind = "pve"
//! target_path = [10, 11, 28]
//! rest_path = [11, 10, 3]
//! min_health = 100
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use walls_battle::CombatTiming;
use walls_client::GameApi;

use crate::error::BotError;
use crate::strategies::{
    Conditional, DEFAULT_REST_DURATION, Patrol, Pve, PveOptions, Rest, ShadowPvp, ShadowPvpOptions,
};
use crate::strategy::Strategy;

const DEFAULT_LEVEL_RANGE: u32 = 2;
const DEFAULT_HEAL_BELOW_PERCENT: i32 = 50;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
pub struct BotConfig {
    /// API origin, defaults to the live game server
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(rename = "account", default)]
    pub accounts: Vec<AccountConfig>,
}

impl BotConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.accounts.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one [[account]] is required".to_string(),
            ));
        }

        for account in &self.accounts {
            if account.token.is_none() && account.password.is_none() {
                return Err(ConfigError::Invalid(format!(
                    "account '{}' needs a token or a password",
                    account.display_name()
                )));
            }
        }

        Ok(())
    }
}

/// Overrides for [`CombatTiming`], in milliseconds
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimingConfig {
    pub attack_delay_ms: Option<u64>,
    pub battle_check_interval_ms: Option<u64>,
    pub rest_interval_ms: Option<u64>,
}

impl TimingConfig {
    pub fn to_timing(&self) -> CombatTiming {
        let defaults = CombatTiming::default();
        let or = |ms: Option<u64>, default| ms.map_or(default, Duration::from_millis);

        CombatTiming {
            attack_delay: or(self.attack_delay_ms, defaults.attack_delay),
            battle_check_interval: or(
                self.battle_check_interval_ms,
                defaults.battle_check_interval,
            ),
            rest_interval: or(self.rest_interval_ms, defaults.rest_interval),
        }
    }
}

#[derive(Deserialize)]
pub struct AccountConfig {
    /// Label used in logs, defaults to the username
    #[serde(default)]
    pub name: Option<String>,

    pub username: String,

    #[serde(default)]
    pub password: Option<String>,

    /// Existing session token; a password is still needed to refresh it
    #[serde(default)]
    pub token: Option<String>,

    /// Consumable to drink when health gets low
    #[serde(default)]
    pub heal_item: Option<String>,

    #[serde(default)]
    pub heal_below_percent: Option<i32>,

    pub strategy: StrategyConfig,
}

impl AccountConfig {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.username)
    }

    pub fn heal_below_percent(&self) -> i32 {
        self.heal_below_percent.unwrap_or(DEFAULT_HEAL_BELOW_PERCENT)
    }
}

impl fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountConfig")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("heal_item", &self.heal_item)
            .field("heal_below_percent", &self.heal_below_percent)
            .field("strategy", &self.strategy)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    ShadowPvp {
        min_health: i32,
        #[serde(default = "default_level_range")]
        level_range: u32,
        #[serde(default)]
        entry_delay_ms: Option<u64>,
    },
    Pve {
        target_path: Vec<u32>,
        rest_path: Vec<u32>,
        min_health: i32,
        #[serde(default)]
        optimal_health: Option<i32>,
    },
    Patrol {
        routes: Vec<Vec<u32>>,
    },
    Rest {
        location: Vec<u32>,
        #[serde(default)]
        duration_ms: Option<u64>,
    },
    Conditional {
        target_path: Vec<u32>,
        #[serde(default)]
        min_energy: Option<i32>,
        #[serde(default)]
        min_health_percent: Option<i32>,
    },
}

fn default_level_range() -> u32 {
    DEFAULT_LEVEL_RANGE
}

impl StrategyConfig {
    /// Build the configured strategy, validating its options
    pub fn build<C: GameApi + 'static>(&self) -> Result<Box<dyn Strategy<C>>, BotError> {
        let strategy: Box<dyn Strategy<C>> = match self {
            Self::ShadowPvp {
                min_health,
                level_range,
                entry_delay_ms,
            } => Box::new(ShadowPvp::new(ShadowPvpOptions {
                min_health: *min_health,
                level_range: *level_range,
                entry_delay: entry_delay_ms.map(Duration::from_millis),
            })?),
            Self::Pve {
                target_path,
                rest_path,
                min_health,
                optimal_health,
            } => Box::new(Pve::new(PveOptions {
                target_path: target_path.clone(),
                rest_path: rest_path.clone(),
                min_health: *min_health,
                optimal_health: *optimal_health,
            })?),
            Self::Patrol { routes } => Box::new(Patrol::new(routes.clone())?),
            Self::Rest {
                location,
                duration_ms,
            } => Box::new(Rest::new(
                location.clone(),
                duration_ms.map_or(DEFAULT_REST_DURATION, Duration::from_millis),
            )?),
            Self::Conditional {
                target_path,
                min_energy,
                min_health_percent,
            } => {
                let mut strategy = Conditional::new(target_path.clone())?;
                if let Some(min_energy) = *min_energy {
                    strategy = strategy.with_condition(move |s| s.player.energy >= min_energy);
                }
                if let Some(min_percent) = *min_health_percent {
                    strategy =
                        strategy.with_condition(move |s| s.player.health.percent() >= min_percent);
                }
                Box::new(strategy)
            }
        };

        Ok(strategy)
    }
}
