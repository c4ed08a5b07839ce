//! Game state snapshot
//!
//! These types represent the JSON returned by `GET /sync`. Only the parts
//! the bot reacts to are modelled; everything else is ignored.

use serde::Deserialize;

use super::battle_state::BattleState;

/// Point-in-time view of the account, refetched on every poll
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub player: Player,

    pub battle: BattleState,

    /// Owned consumables, split by whether they sit in a quick slot
    #[serde(default)]
    pub consumables: Consumables,
}

impl StateSnapshot {
    pub fn in_battle(&self) -> bool {
        self.battle.is_active()
    }

    /// Find an owned consumable by item id (equipped or not)
    pub fn find_consumable(&self, item_id: &str) -> Option<&UserItem> {
        self.consumables.iter().find(|item| item.id == item_id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,

    pub username: String,

    pub health: Health,

    #[serde(default)]
    pub energy: i32,

    #[serde(default)]
    pub max_energy: i32,

    #[serde(default)]
    pub level: u32,

    #[serde(default)]
    pub gold: i64,

    /// Unallocated stat points
    #[serde(default)]
    pub stat_points: u32,

    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
    #[serde(default)]
    pub percentage: f64,
}

impl Health {
    /// Rounded percentage of max health, computed locally
    pub fn percent(&self) -> i32 {
        percent_of(self.current, self.max)
    }
}

/// Rounded `value / max` as a percentage; zero when `max` is not positive
pub fn percent_of(value: i32, max: i32) -> i32 {
    if max <= 0 {
        return 0;
    }
    ((value as f64 / max as f64) * 100.0).round() as i32
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub has_battle: bool,

    #[serde(default)]
    pub has_shop: bool,

    #[serde(default)]
    pub has_mine: bool,

    #[serde(default)]
    pub has_market: bool,
}

/// The server sends `null` instead of an empty list
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Consumables {
    #[serde(default)]
    pub equipped: Option<Vec<UserItem>>,

    #[serde(default)]
    pub unequipped: Option<Vec<UserItem>>,
}

impl Consumables {
    pub fn iter(&self) -> impl Iterator<Item = &UserItem> {
        self.unequipped
            .iter()
            .flatten()
            .chain(self.equipped.iter().flatten())
    }
}

/// An owned item instance
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserItem {
    /// Catalogue id, e.g. `potion-heal-large`
    pub id: String,

    /// Id of this particular owned copy
    pub user_item_id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub slot: Option<String>,
}

/// Health and battle flag, the two things a cycle gates on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerState {
    pub health: Health,
    pub in_battle: bool,
}

impl From<&StateSnapshot> for PlayerState {
    fn from(snapshot: &StateSnapshot) -> Self {
        Self {
            health: snapshot.player.health,
            in_battle: snapshot.in_battle(),
        }
    }
}
