//! Combat action results

use serde::Deserialize;

use crate::ParseError;

/// Response to `POST /combat/action`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawAttackResponse")]
pub struct AttackResponse {
    pub success: bool,

    /// `None` when the server rejected the action (`success: false`)
    pub outcome: Option<AttackOutcome>,
}

impl AttackResponse {
    pub fn resolved(result: AttackResult) -> Self {
        Self {
            success: true,
            outcome: Some(AttackOutcome::Resolved(result)),
        }
    }

    pub fn unresolved(waiting: Waiting) -> Self {
        Self {
            success: true,
            outcome: Some(AttackOutcome::Unresolved(waiting)),
        }
    }

    pub fn rejected() -> Self {
        Self {
            success: false,
            outcome: None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self.outcome, Some(AttackOutcome::Unresolved(_)))
    }

    pub fn result(&self) -> Option<&AttackResult> {
        match &self.outcome {
            Some(AttackOutcome::Resolved(result)) => Some(result),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttackOutcome {
    /// Both sides acted and the turn was resolved
    Resolved(AttackResult),
    /// Still waiting on the opponent's action for this turn
    Unresolved(Waiting),
}

#[derive(Deserialize)]
struct RawAttackResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    resolved: bool,
    #[serde(default)]
    result: Option<AttackResult>,
    #[serde(default)]
    waiting: Option<Waiting>,
}

impl TryFrom<RawAttackResponse> for AttackResponse {
    type Error = ParseError;

    fn try_from(raw: RawAttackResponse) -> Result<Self, Self::Error> {
        if !raw.success {
            return Ok(Self::rejected());
        }

        let outcome = if raw.resolved {
            let result = raw
                .result
                .ok_or_else(|| ParseError::MissingField("result".to_string()))?;
            AttackOutcome::Resolved(result)
        } else {
            AttackOutcome::Unresolved(raw.waiting.unwrap_or_default())
        };

        Ok(Self {
            success: true,
            outcome: Some(outcome),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackResult {
    pub you_dealt: HitReport,

    pub you_received: HitReport,

    pub target_health: i32,

    pub your_health: i32,

    #[serde(default)]
    pub target_energy: i32,

    #[serde(default)]
    pub your_energy: i32,

    #[serde(default)]
    pub target_died: bool,

    #[serde(default)]
    pub you_died: bool,

    #[serde(default)]
    pub battle_ended: bool,

    #[serde(default)]
    pub your_streak: u32,

    #[serde(default)]
    pub target_streak: u32,
}

/// One direction of an exchange
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitReport {
    pub damage: i32,

    #[serde(default)]
    pub is_blocked: bool,

    #[serde(default)]
    pub is_dodged: bool,

    #[serde(default)]
    pub is_crit: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waiting {
    #[serde(default)]
    pub target_id: String,

    #[serde(default)]
    pub target_name: String,

    #[serde(default)]
    pub deadline: Option<String>,
}
