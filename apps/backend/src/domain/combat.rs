//! Attack resolution.

use serde::Serialize;

use crate::domain::session::Session;
use crate::errors::domain::DomainError;

pub use crate::domain::cards::effective_attack;

/// What a successful attack did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttackOutcome {
    pub attacker_id: String,
    pub target_id: String,
    pub damage: u32,
    pub target_health: i32,
    pub target_defeated: bool,
    /// The attack ended the game.
    pub game_finished: bool,
}

/// One of the turn owner's characters strikes one opposing character.
///
/// Validation runs entirely before mutation; on error the session is
/// untouched.
pub fn attack(
    session: &mut Session,
    player_id: &str,
    attacker_id: &str,
    target_id: &str,
) -> Result<AttackOutcome, DomainError> {
    let acting = session.require_turn(player_id)?;
    let (own, opponent) = session.slots_mut(acting).ok_or_else(|| {
        DomainError::GameNotInProgress("no opponent seated".to_string())
    })?;

    let attacker_pos = own.character_position(attacker_id).ok_or_else(|| {
        DomainError::InvalidAttacker(format!("{attacker_id} is not in your roster"))
    })?;
    let attacker = &own.character_instances[attacker_pos];
    if !attacker.is_alive() {
        return Err(DomainError::InvalidAttacker(format!(
            "{attacker_id} is defeated"
        )));
    }
    if attacker.current_stats.turns_remaining == 0 {
        return Err(DomainError::InvalidAttacker(format!(
            "{attacker_id} has no attacks left this turn"
        )));
    }

    let target_pos = opponent.character_position(target_id).ok_or_else(|| {
        DomainError::InvalidTarget(format!("{target_id} is not in the opposing roster"))
    })?;
    if !opponent.character_instances[target_pos].is_alive() {
        return Err(DomainError::InvalidTarget(format!(
            "{target_id} is already defeated"
        )));
    }

    let damage = attacker.effective_attack();
    let target = &mut opponent.character_instances[target_pos];
    target.apply_damage(damage);
    let target_health = target.current_stats.health;
    let target_defeated = !target.is_alive();

    own.character_instances[attacker_pos]
        .current_stats
        .turns_remaining -= 1;

    let game_finished = session.check_termination();

    Ok(AttackOutcome {
        attacker_id: attacker_id.to_string(),
        target_id: target_id.to_string(),
        damage,
        target_health,
        target_defeated,
        game_finished,
    })
}
