use std::fmt;

/// What a bot is doing right now, published for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleStatus {
    #[default]
    Idle,
    Traveling,
    Waiting,
    Attacking,
    Resting,
    Error,
}

impl CycleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Traveling => "traveling",
            Self::Waiting => "waiting",
            Self::Attacking => "attacking",
            Self::Resting => "resting",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
