//! Player-specific projection of a session.
//!
//! A [`Snapshot`] is what one player is allowed to see: their own slot in
//! full, the opponent reduced to character identity and health plus a bonus
//! hand count. Every outbound emission goes through [`project_for`].

use serde::Serialize;

use crate::catalog::CardDefinition;
use crate::domain::cards::{BonusEffect, CardInstance};
use crate::domain::session::{ConnectionStatus, PlayerSlot, Session, SessionStatus, SlotId};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub session_id: String,
    pub round_number: u32,
    pub turn_owner: SlotId,
    pub status: SessionStatus,
    pub is_your_turn: bool,
    pub your_slot: SlotId,
    pub winner: Option<SlotId>,
    /// Set only on the viewer's own turn.
    pub bonus_target_this_turn: Option<String>,
    pub you: OwnView,
    pub opponent: Option<OpponentView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnView {
    pub player_id: String,
    pub display_name: String,
    pub active_character_id: Option<String>,
    pub characters: Vec<OwnCharacter>,
    pub bonus_hand: Vec<BonusCardView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnCharacter {
    pub id: String,
    pub name: String,
    pub power_name: String,
    pub description: String,
    pub base_health: u32,
    pub base_attack: u32,
    pub base_turns_per_round: u32,
    pub health: i32,
    pub attack: u32,
    pub turns_remaining: u32,
    pub alive: bool,
    pub active_bonuses: Vec<BonusEffect>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BonusCardView {
    pub id: String,
    pub name: String,
    pub power_name: String,
    pub description: String,
    pub bonus_percent: u32,
    pub bonus_duration: u32,
}

/// What the opponent's slot looks like from across the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpponentView {
    pub display_name: String,
    pub connected: bool,
    pub characters: Vec<OpponentCharacter>,
    pub bonus_hand_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpponentCharacter {
    pub id: String,
    pub name: String,
    pub health: i32,
    pub alive: bool,
}

impl From<&CardInstance> for OwnCharacter {
    fn from(card: &CardInstance) -> Self {
        let def = &card.definition;
        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            power_name: def.power_name.clone(),
            description: def.description.clone(),
            base_health: def.base_health,
            base_attack: def.base_attack,
            base_turns_per_round: def.base_turns_per_round,
            health: card.current_stats.health,
            attack: card.current_stats.attack,
            turns_remaining: card.current_stats.turns_remaining,
            alive: card.is_alive(),
            active_bonuses: card.current_stats.active_bonuses.clone(),
        }
    }
}

impl From<&CardDefinition> for BonusCardView {
    fn from(def: &CardDefinition) -> Self {
        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            power_name: def.power_name.clone(),
            description: def.description.clone(),
            bonus_percent: def.bonus_percent,
            bonus_duration: def.bonus_duration,
        }
    }
}

impl From<&PlayerSlot> for OwnView {
    fn from(slot: &PlayerSlot) -> Self {
        Self {
            player_id: slot.player_id.clone(),
            display_name: slot.display_name.clone(),
            active_character_id: slot.active_character_id.clone(),
            characters: slot.character_instances.iter().map(Into::into).collect(),
            bonus_hand: slot
                .bonus_hand
                .iter()
                .map(|card| BonusCardView::from(&**card))
                .collect(),
        }
    }
}

impl From<&PlayerSlot> for OpponentView {
    fn from(slot: &PlayerSlot) -> Self {
        Self {
            display_name: slot.display_name.clone(),
            connected: slot.connection_status == ConnectionStatus::Connected,
            characters: slot
                .character_instances
                .iter()
                .map(|card| OpponentCharacter {
                    id: card.id().to_string(),
                    name: card.definition.name.clone(),
                    health: card.current_stats.health,
                    alive: card.is_alive(),
                })
                .collect(),
            bonus_hand_count: slot.bonus_hand.len(),
        }
    }
}

/// Project `session` for `player_id`. Non-members are rejected.
pub fn project_for(session: &Session, player_id: &str) -> Result<Snapshot, DomainError> {
    let your_slot = session.member_slot(player_id)?;
    let own = session
        .slot(your_slot)
        .ok_or_else(|| DomainError::NotAMember(player_id.to_string()))?;
    let is_your_turn =
        session.status == SessionStatus::Playing && session.turn_owner == your_slot;

    Ok(Snapshot {
        session_id: session.session_id.clone(),
        round_number: session.round_number,
        turn_owner: session.turn_owner,
        status: session.status,
        is_your_turn,
        your_slot,
        winner: session.winner,
        bonus_target_this_turn: if is_your_turn {
            session.turn_scoped_bonus_target.clone()
        } else {
            None
        },
        you: own.into(),
        opponent: session.slot(your_slot.other()).map(Into::into),
    })
}

/// One snapshot per current slot holder, keyed by player id.
pub fn project_all(session: &Session) -> Vec<(String, Snapshot)> {
    session
        .holders()
        .into_iter()
        .filter_map(|player_id| {
            project_for(session, &player_id)
                .ok()
                .map(|snapshot| (player_id, snapshot))
        })
        .collect()
}
