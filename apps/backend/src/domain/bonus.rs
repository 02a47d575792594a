//! Bonus application and expiry.

use crate::domain::cards::BonusEffect;
use crate::domain::session::{PlayerSlot, Session};
use crate::errors::domain::DomainError;

/// Play a bonus card from the turn owner's hand onto one of their own
/// living characters.
///
/// Only one distinct character may be buffed per turn; further bonuses on
/// that same character are allowed.
pub fn apply_bonus(
    session: &mut Session,
    player_id: &str,
    bonus_card_id: &str,
    target_id: &str,
) -> Result<BonusEffect, DomainError> {
    let acting = session.require_turn(player_id)?;
    let scoped = session.turn_scoped_bonus_target.clone();
    let slot = session
        .slot_mut(acting)
        .ok_or_else(|| DomainError::NotAMember(player_id.to_string()))?;

    let bonus_pos = slot
        .bonus_hand
        .iter()
        .position(|card| card.id == bonus_card_id)
        .ok_or_else(|| {
            DomainError::CardNotFound(format!("bonus {bonus_card_id} is not in your hand"))
        })?;
    let target_pos = slot.character_position(target_id).ok_or_else(|| {
        DomainError::CardNotFound(format!("character {target_id} is not in your roster"))
    })?;
    if !slot.character_instances[target_pos].is_alive() {
        return Err(DomainError::InvalidTarget(format!(
            "{target_id} is defeated"
        )));
    }
    if let Some(current) = scoped.as_deref() {
        if current != target_id {
            return Err(DomainError::MultipleTargetsForbidden(current.to_string()));
        }
    }

    let card = slot.bonus_hand.remove(bonus_pos);
    let effect = BonusEffect::from_card(&card);
    let target = &mut slot.character_instances[target_pos];
    target.current_stats.active_bonuses.push(effect.clone());
    target.recalculate_attack();

    session.turn_scoped_bonus_target = Some(target_id.to_string());
    Ok(effect)
}

/// Age every bonus effect in `slot` by one turn and drop the spent ones.
///
/// Returns the effects that expired.
pub fn tick_bonuses(slot: &mut PlayerSlot) -> Vec<BonusEffect> {
    let mut expired = Vec::new();
    for card in &mut slot.character_instances {
        let before = card.current_stats.active_bonuses.len();
        for effect in &mut card.current_stats.active_bonuses {
            effect.turns_remaining = effect.turns_remaining.saturating_sub(1);
        }
        card.current_stats.active_bonuses.retain(|effect| {
            if effect.turns_remaining == 0 {
                expired.push(effect.clone());
                false
            } else {
                true
            }
        });
        if card.current_stats.active_bonuses.len() != before {
            card.recalculate_attack();
        }
    }
    expired
}
