//! Per-turn battle log lines

use walls_protocol::{AttackResult, percent_of};

use crate::positions::AttackPositions;

/// Annotations for the damage we dealt
pub fn dealt_modifiers(result: &AttackResult) -> Vec<&'static str> {
    let mut modifiers = Vec::new();
    if result.you_dealt.is_crit {
        modifiers.push("CRIT");
    }
    if result.you_received.is_dodged {
        modifiers.push("DODGED");
    }
    if result.you_received.is_blocked {
        modifiers.push("BLOCKED");
    }
    modifiers
}

/// Annotations for the damage we took
pub fn received_modifiers(result: &AttackResult) -> Vec<&'static str> {
    let mut modifiers = Vec::new();
    if result.you_received.is_crit {
        modifiers.push("CRIT");
    }
    if result.you_dealt.is_dodged {
        modifiers.push("DODGED");
    }
    if result.you_dealt.is_blocked {
        modifiers.push("BLOCKED");
    }
    modifiers
}

fn suffix(modifiers: &[&str]) -> String {
    if modifiers.is_empty() {
        String::new()
    } else {
        format!(" [{}]", modifiers.join(", "))
    }
}

pub fn describe_positions(turn: u32, positions: &AttackPositions) -> String {
    let [first, second] = positions.defense();
    format!(
        "Turn {} - Attacking {}, defending {} & {}",
        turn,
        positions.attack(),
        first,
        second
    )
}

pub fn describe_dealt(result: &AttackResult, target_max_hp: i32) -> String {
    format!(
        "Dealt: {} damage{} -> Target: {}/{} HP ({}%)",
        result.you_dealt.damage,
        suffix(&dealt_modifiers(result)),
        result.target_health,
        target_max_hp,
        percent_of(result.target_health, target_max_hp)
    )
}

pub fn describe_received(result: &AttackResult, player_max_hp: i32) -> String {
    format!(
        "Received: {} damage{} -> You: {}/{} HP ({}%)",
        result.you_received.damage,
        suffix(&received_modifiers(result)),
        result.your_health,
        player_max_hp,
        percent_of(result.your_health, player_max_hp)
    )
}

/// Log both directions of a resolved exchange
pub fn log_turn(result: &AttackResult, target_max_hp: i32, player_max_hp: i32) {
    tracing::info!(
        damage = result.you_dealt.damage,
        target_hp = result.target_health,
        "{}",
        describe_dealt(result, target_max_hp)
    );
    tracing::info!(
        damage = result.you_received.damage,
        hp = result.your_health,
        "{}",
        describe_received(result, player_max_hp)
    );

    if result.target_died {
        tracing::info!("Target defeated!");
    }
    if result.you_died {
        tracing::error!("You were defeated!");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::positions::BodyZone;
    use walls_protocol::HitReport;

    fn exchange() -> AttackResult {
        AttackResult {
            you_dealt: HitReport {
                damage: 18,
                is_crit: true,
                is_dodged: true,
                is_blocked: false,
            },
            you_received: HitReport {
                damage: 7,
                is_crit: false,
                is_dodged: false,
                is_blocked: true,
            },
            target_health: 82,
            your_health: 150,
            ..Default::default()
        }
    }

    #[test]
    fn test_modifiers() {
        let result = exchange();
        assert_eq!(dealt_modifiers(&result), vec!["CRIT", "BLOCKED"]);
        assert_eq!(received_modifiers(&result), vec!["DODGED"]);
        assert!(dealt_modifiers(&AttackResult::default()).is_empty());
    }

    #[test]
    fn test_describe_lines() {
        let result = exchange();
        assert_eq!(
            describe_dealt(&result, 200),
            "Dealt: 18 damage [CRIT, BLOCKED] -> Target: 82/200 HP (41%)"
        );
        assert_eq!(
            describe_received(&result, 300),
            "Received: 7 damage [DODGED] -> You: 150/300 HP (50%)"
        );
    }

    #[test]
    fn test_describe_positions() {
        let positions =
            AttackPositions::new(BodyZone::Head, BodyZone::Chest, BodyZone::Legs).unwrap();
        assert_eq!(
            describe_positions(3, &positions),
            "Turn 3 - Attacking Head, defending Chest & Legs"
        );
    }
}
