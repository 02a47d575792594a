use serde::{Deserialize, Serialize};

/// Characters and bonuses dealt to each player.
pub const HAND_SIZE: usize = 5;

/// Length of the shareable session code.
pub const SESSION_CODE_LEN: usize = 6;

/// Which slot opens the game once the guest has joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstTurnPolicy {
    /// The host always moves first.
    #[default]
    SlotA,
    /// Coin flip at join time.
    Random,
}

/// Whether the guest's hand may repeat cards dealt to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawPolicy {
    /// Guest draws exclude every id dealt to the host.
    #[default]
    Exclusive,
    /// Both hands are drawn from the full catalog.
    Independent,
}

/// Per-process game rules, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRules {
    pub hand_size: usize,
    pub first_turn: FirstTurnPolicy,
    pub draw: DrawPolicy,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            hand_size: HAND_SIZE,
            first_turn: FirstTurnPolicy::default(),
            draw: DrawPolicy::default(),
        }
    }
}

impl std::str::FromStr for FirstTurnPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slot_a" | "host" => Ok(Self::SlotA),
            "random" => Ok(Self::Random),
            other => Err(format!("unknown first-turn policy '{other}'")),
        }
    }
}

impl std::str::FromStr for DrawPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exclusive" => Ok(Self::Exclusive),
            "independent" => Ok(Self::Independent),
            other => Err(format!("unknown draw policy '{other}'")),
        }
    }
}
