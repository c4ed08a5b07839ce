use serde::Deserialize;

use super::snapshot::Location;

/// Response to `GET /travel/destinations`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelDestinations {
    pub destinations: Vec<TravelDestination>,
    pub current_location: Location,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelDestination {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub has_battle: bool,

    #[serde(default)]
    pub has_shop: bool,

    #[serde(default)]
    pub is_guarded: bool,

    #[serde(default)]
    pub player_has_item: bool,

    #[serde(default)]
    pub travel_time_free_minutes: u32,

    #[serde(default)]
    pub travel_cost_gold: u32,
}
