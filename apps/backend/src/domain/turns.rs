//! Turn hand-over, active character selection, and forfeit.

use crate::domain::bonus::tick_bonuses;
use crate::domain::cards::BonusEffect;
use crate::domain::session::{Session, SlotId};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnChange {
    pub ended: SlotId,
    pub next: SlotId,
    pub round_number: u32,
    /// Effects of the ending player that ran out.
    pub expired: Vec<BonusEffect>,
    pub game_finished: bool,
}

/// Hand the turn to the other side.
///
/// Order: tick the ending player's bonuses, exhaust their attacks, refresh
/// the next player's living characters, flip the owner, bump the round,
/// clear the bonus target. Termination is re-checked last.
pub fn end_turn(session: &mut Session, player_id: &str) -> Result<TurnChange, DomainError> {
    let ending = session.require_turn(player_id)?;
    let next = ending.other();

    let (own, opponent) = session
        .slots_mut(ending)
        .ok_or_else(|| DomainError::GameNotInProgress("no opponent seated".to_string()))?;
    let expired = tick_bonuses(own);
    own.exhaust_turns();
    opponent.refresh_turns();

    session.turn_owner = next;
    session.round_number = session.round_number.saturating_add(1);
    session.turn_scoped_bonus_target = None;

    let game_finished = session.check_termination();

    Ok(TurnChange {
        ended: ending,
        next,
        round_number: session.round_number,
        expired,
        game_finished,
    })
}

/// Mark one of the turn owner's living characters as active.
pub fn select_character(
    session: &mut Session,
    player_id: &str,
    character_id: &str,
) -> Result<(), DomainError> {
    let acting = session.require_turn(player_id)?;
    let slot = session
        .slot_mut(acting)
        .ok_or_else(|| DomainError::NotAMember(player_id.to_string()))?;

    let card = slot.character(character_id).ok_or_else(|| {
        DomainError::CardNotFound(format!("character {character_id} is not in your roster"))
    })?;
    if !card.is_alive() {
        return Err(DomainError::InvalidTarget(format!(
            "{character_id} is defeated"
        )));
    }

    slot.active_character_id = Some(character_id.to_string());
    Ok(())
}

/// Concede a game in progress. Either player may forfeit on any turn.
///
/// Returns the winning slot.
pub fn forfeit(session: &mut Session, player_id: &str) -> Result<SlotId, DomainError> {
    let loser = session.member_slot(player_id)?;
    session.ensure_playing()?;
    let winner = loser.other();
    session.finish(Some(winner));
    Ok(winner)
}
