use serde::{Deserialize, Serialize};

use crate::domain::Snapshot;
use crate::errors::ErrorCode;

pub const PROTOCOL_VERSION: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Hello {
        protocol: i32,
    },
    CreateGame {
        name: String,
    },
    JoinGame {
        session_id: String,
        name: String,
    },
    GetSnapshot {
        session_id: String,
    },
    Attack {
        session_id: String,
        attacker_id: String,
        target_id: String,
    },
    ApplyBonus {
        session_id: String,
        bonus_card_id: String,
        target_id: String,
    },
    EndTurn {
        session_id: String,
    },
    SelectCharacter {
        session_id: String,
        character_id: String,
    },
    Forfeit {
        session_id: String,
    },
}

impl ClientMsg {
    /// The session an operation targets, if any.
    pub fn session_id(&self) -> Option<&str> {
        match self {
            ClientMsg::Hello { .. } | ClientMsg::CreateGame { .. } => None,
            ClientMsg::JoinGame { session_id, .. }
            | ClientMsg::GetSnapshot { session_id }
            | ClientMsg::Attack { session_id, .. }
            | ClientMsg::ApplyBonus { session_id, .. }
            | ClientMsg::EndTurn { session_id }
            | ClientMsg::SelectCharacter { session_id, .. }
            | ClientMsg::Forfeit { session_id } => Some(session_id),
        }
    }
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    HelloAck {
        protocol: i32,
        player_id: String,
    },

    GameCreated {
        session_id: String,
        snapshot: Snapshot,
    },

    GameState {
        snapshot: Snapshot,
    },

    Error {
        code: ErrorCode,
        message: String,
    },
}
